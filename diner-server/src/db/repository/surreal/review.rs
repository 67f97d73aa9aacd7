//! Review Repository

use async_trait::async_trait;
use shared::models::Review;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::BaseRepository;
use crate::db::repository::{RepoResult, ReviewStore};

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn find_all(&self) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM review")
            .await?
            .take(0)?;
        Ok(reviews)
    }

    async fn insert(&self, review: Review) -> RepoResult<Review> {
        self.base
            .db()
            .query(
                "CREATE type::thing('review', $uid) SET \
                 uid = $uid, name = $name, details = $details, rating = $rating, recipe = $recipe \
                 RETURN NONE",
            )
            .bind(("uid", review.id.clone()))
            .bind(("name", review.name.clone()))
            .bind(("details", review.details.clone()))
            .bind(("rating", review.rating))
            .bind(("recipe", review.recipe.clone()))
            .await?
            .check()?;
        Ok(review)
    }
}

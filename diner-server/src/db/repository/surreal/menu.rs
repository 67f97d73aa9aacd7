//! Menu Repository

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use shared::models::MenuItem;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::BaseRepository;
use crate::db::repository::{MenuCatalog, RepoError, RepoResult};

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl MenuCatalog for MenuRepository {
    async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM menu ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    async fn insert(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let price = item
            .price
            .to_f64()
            .ok_or_else(|| RepoError::Validation(format!("Invalid price {}", item.price)))?;
        let result = self
            .base
            .db()
            .query(
                "CREATE type::thing('menu', $uid) SET \
                 uid = $uid, name = $name, recipe = $recipe, image = $image, \
                 category = $category, price = $price \
                 RETURN NONE",
            )
            .bind(("uid", item.id.clone()))
            .bind(("name", item.name.clone()))
            .bind(("recipe", item.recipe.clone()))
            .bind(("image", item.image.clone()))
            .bind(("category", item.category.clone()))
            .bind(("price", price))
            .await?
            .check();

        match result {
            Ok(_) => Ok(item),
            Err(e) if e.to_string().contains("already exists") => {
                Err(RepoError::Duplicate(format!("Menu item {}", item.id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

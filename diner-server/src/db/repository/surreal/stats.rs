//! Stats Repository
//!
//! The three reads behind the admin statistics share one read transaction.

use async_trait::async_trait;
use shared::models::{MenuItem, Payment};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, first_count};
use crate::db::repository::{RepoResult, StatsSnapshot, StatsSource};

const SNAPSHOT_QUERY: &str = r#"
BEGIN TRANSACTION;
SELECT count() AS count FROM users GROUP ALL;
SELECT * OMIT id FROM menu ORDER BY category, name;
SELECT * OMIT id FROM payment ORDER BY createdAt;
COMMIT TRANSACTION;
"#;

#[derive(Clone)]
pub struct StatsRepository {
    base: BaseRepository,
}

impl StatsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl StatsSource for StatsRepository {
    async fn snapshot(&self) -> RepoResult<StatsSnapshot> {
        let mut response = self.base.db().query(SNAPSHOT_QUERY).await?;
        let users: Vec<CountRow> = response.take(0)?;
        let menu: Vec<MenuItem> = response.take(1)?;
        let payments: Vec<Payment> = response.take(2)?;
        Ok(StatsSnapshot {
            users: first_count(users),
            menu,
            payments,
        })
    }
}

//! Capacity Repository

use async_trait::async_trait;
use shared::models::CapacityOption;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::BaseRepository;
use crate::db::repository::{CapacityCatalog, RepoResult};

#[derive(Clone)]
pub struct CapacityRepository {
    base: BaseRepository,
}

impl CapacityRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CapacityCatalog for CapacityRepository {
    async fn find_by_guests(&self, guests: u32) -> RepoResult<Option<CapacityOption>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM capacity WHERE guests = $guests LIMIT 1")
            .bind(("guests", guests))
            .await?;
        let options: Vec<CapacityOption> = result.take(0)?;
        Ok(options.into_iter().next())
    }

    async fn find_all(&self) -> RepoResult<Vec<CapacityOption>> {
        let options: Vec<CapacityOption> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM capacity ORDER BY guests")
            .await?
            .take(0)?;
        Ok(options)
    }

    async fn upsert(&self, option: CapacityOption) -> RepoResult<CapacityOption> {
        // keyed by party size
        let key = option.guests.to_string();
        self.base
            .db()
            .query(
                "UPSERT type::thing('capacity', $key) \
                 SET guests = $guests, timeSlots = $time_slots \
                 RETURN NONE",
            )
            .bind(("key", key))
            .bind(("guests", option.guests))
            .bind(("time_slots", option.time_slots.clone()))
            .await?
            .check()?;
        Ok(option)
    }
}

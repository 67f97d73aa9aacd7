//! Capacity catalog cache
//!
//! Availability reads go through this cache; admission always reads the
//! catalog directly. Entries expire after the configured TTL, and a
//! missing option is cached too so repeated misses stay cheap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use shared::models::CapacityOption;

use crate::db::repository::{CapacityCatalog, RepoResult};

#[derive(Clone)]
struct Entry {
    loaded_at: Instant,
    option: Option<CapacityOption>,
}

pub struct CapacityCache {
    catalog: Arc<dyn CapacityCatalog>,
    ttl: Duration,
    entries: DashMap<u32, Entry>,
}

impl CapacityCache {
    pub fn new(catalog: Arc<dyn CapacityCatalog>, ttl: Duration) -> Self {
        Self {
            catalog,
            ttl,
            entries: DashMap::new(),
        }
    }

    /// Capacity option for `guests`, served from cache while fresh
    pub async fn get(&self, guests: u32) -> RepoResult<Option<CapacityOption>> {
        if let Some(entry) = self.entries.get(&guests)
            && entry.loaded_at.elapsed() < self.ttl
        {
            return Ok(entry.option.clone());
        }

        let option = self.catalog.find_by_guests(guests).await?;
        self.entries.insert(
            guests,
            Entry {
                loaded_at: Instant::now(),
                option: option.clone(),
            },
        );
        Ok(option)
    }

    /// Drop the cached option for `guests`
    pub fn invalidate(&self, guests: u32) {
        self.entries.remove(&guests);
    }

    /// Write through to the catalog and invalidate the cached entry;
    /// the next [`Self::get`] reloads it
    pub async fn store(&self, option: CapacityOption) -> RepoResult<CapacityOption> {
        let guests = option.guests;
        let stored = self.catalog.upsert(option).await?;
        self.invalidate(guests);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::MemoryStore;
    use shared::models::TimeSlot;

    fn option(capacity: u32) -> CapacityOption {
        CapacityOption {
            guests: 2,
            time_slots: vec![TimeSlot {
                slot: "19:00".into(),
                capacity,
            }],
        }
    }

    #[tokio::test]
    async fn test_stale_until_ttl_or_invalidate() {
        let store = Arc::new(MemoryStore::new());
        store.upsert(option(3)).await.unwrap();
        let cache = CapacityCache::new(store.clone(), Duration::from_secs(60));

        assert_eq!(cache.get(2).await.unwrap().unwrap().capacity_of("19:00"), Some(3));

        // direct catalog write bypasses the cache
        store.upsert(option(5)).await.unwrap();
        assert_eq!(cache.get(2).await.unwrap().unwrap().capacity_of("19:00"), Some(3));

        cache.invalidate(2);
        assert_eq!(cache.get(2).await.unwrap().unwrap().capacity_of("19:00"), Some(5));
    }

    #[tokio::test]
    async fn test_store_invalidates_entry() {
        let store = Arc::new(MemoryStore::new());
        let cache = CapacityCache::new(store.clone(), Duration::from_secs(60));
        assert!(cache.get(2).await.unwrap().is_none());
        assert!(cache.entries.contains_key(&2));

        let stored = cache.store(option(4)).await.unwrap();
        assert_eq!(stored, option(4));
        assert!(!cache.entries.contains_key(&2));
        assert_eq!(
            store.find_by_guests(2).await.unwrap().unwrap().capacity_of("19:00"),
            Some(4)
        );

        assert_eq!(cache.get(2).await.unwrap().unwrap().capacity_of("19:00"), Some(4));
        assert!(cache.entries.contains_key(&2));
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let store = Arc::new(MemoryStore::new());
        store.upsert(option(1)).await.unwrap();
        let cache = CapacityCache::new(store.clone(), Duration::ZERO);
        cache.get(2).await.unwrap();
        store.upsert(option(9)).await.unwrap();
        assert_eq!(cache.get(2).await.unwrap().unwrap().capacity_of("19:00"), Some(9));
    }
}

//! Keyed async mutexes
//!
//! Admission for the same slot or the same user-day is serialized
//! in-process. Keys are always acquired in sorted order so two requests
//! sharing keys cannot deadlock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Guards for every key of one acquisition, released together on drop
pub struct KeyedGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock all `keys` (deduplicated, sorted)
    pub async fn acquire(&self, mut keys: Vec<String>) -> KeyedGuard {
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let mutex = self
                .locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            guards.push(mutex.lock_owned().await);
        }
        KeyedGuard { _guards: guards }
    }

    /// Drop mutexes nobody holds or waits on
    pub fn prune(&self) {
        self.locks.retain(|_, m| Arc::strong_count(m) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Key serializing admission into one slot
pub fn slot_key(date: &chrono::NaiveDate, slot: &str, party_size: u32) -> String {
    format!("slot:{date}:{slot}:{party_size}")
}

/// Key serializing one user's admissions for one day
pub fn user_day_key(email: &str, day: &chrono::NaiveDate) -> String {
    format!("user:{email}:{day}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks = (0..8).map(|_| {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_seen = max_seen.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(vec!["k".into()]).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            })
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_overlapping_key_sets_do_not_deadlock() {
        let locks = Arc::new(KeyedLocks::new());
        let a = {
            let locks = locks.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _g = locks.acquire(vec!["b".into(), "a".into()]).await;
                }
            })
        };
        let b = {
            let locks = locks.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _g = locks.acquire(vec!["a".into(), "b".into(), "a".into()]).await;
                }
            })
        };
        tokio::time::timeout(Duration::from_secs(5), async {
            a.await.unwrap();
            b.await.unwrap();
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_prune_keeps_held_locks() {
        let locks = KeyedLocks::new();
        let held = locks.acquire(vec!["held".into()]).await;
        drop(locks.acquire(vec!["free".into()]).await);
        assert_eq!(locks.len(), 2);

        locks.prune();
        assert_eq!(locks.len(), 1);
        drop(held);
        locks.prune();
        assert!(locks.is_empty());
    }
}

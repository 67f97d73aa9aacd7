//! SurrealDB repositories
//!
//! Document ID convention: every record carries a plain string `uid` and
//! lives at `type::thing(<table>, $uid)`. Reads use `SELECT * OMIT id` and
//! the models accept `uid` as an alias for `id`, so no `RecordId` leaks
//! into the domain types.

mod booking;
mod capacity;
mod cart;
mod menu;
mod payment;
mod review;
mod stats;
mod user;

pub use booking::BookingRepository;
pub use capacity::CapacityRepository;
pub use cart::CartRepository;
pub use menu::MenuRepository;
pub use payment::PaymentRepository;
pub use review::ReviewRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct UidRow {
    uid: String,
}

/// `SELECT count() ... GROUP ALL` yields no row for an empty table
fn first_count(rows: Vec<CountRow>) -> u64 {
    rows.into_iter().next().map(|r| r.count).unwrap_or(0)
}

/// `THROW` markers surface only in the error text
fn error_mentions(err: &surrealdb::Error, needle: &str) -> bool {
    err.to_string().contains(needle)
}

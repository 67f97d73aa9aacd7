//! Repository Module
//!
//! Typed storage interfaces, one per entity. Two implementations:
//! [`memory::MemoryStore`] (single lock over all tables) and the SurrealDB
//! repositories under [`surreal`].
//!
//! 业务代码只依赖 trait，通过 [`Stores`] 注入。

pub mod memory;
pub mod surreal;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    AdmissionLimits, AdmissionOutcome, Booking, BookingStatus, CapacityOption, CartLine,
    CartLineCreate, MenuItem, Payment, Review, User, UserCreate,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

pub use memory::MemoryStore;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Seat configuration per party size
#[async_trait]
pub trait CapacityCatalog: Send + Sync {
    async fn find_by_guests(&self, guests: u32) -> RepoResult<Option<CapacityOption>>;
    async fn find_all(&self) -> RepoResult<Vec<CapacityOption>>;
    /// Insert or replace the option for `option.guests`
    async fn upsert(&self, option: CapacityOption) -> RepoResult<CapacityOption>;
}

/// Bookings, the only shared state written by admission
#[async_trait]
pub trait ReservationLedger: Send + Sync {
    /// Seat-holding bookings for (date, party size), counted per slot.
    /// Cancelled bookings are not counted.
    async fn count_by_slot(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> RepoResult<HashMap<String, u32>>;

    /// Conditional insert.
    ///
    /// Rejects with `DailyLimitReached` when the owner already created
    /// `daily_limit` bookings on `booking.booked_on`, then with `SlotFull`
    /// when the slot already holds `slot_capacity` seat-holding bookings.
    /// Check and insert happen in one atomic step, also against callers in
    /// other processes sharing the store. Implementations retry their own
    /// transaction conflicts, so an `Err` is never a lost race.
    async fn admit(&self, booking: Booking, limits: AdmissionLimits)
    -> RepoResult<AdmissionOutcome>;

    async fn find_all(&self) -> RepoResult<Vec<Booking>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Booking>>;
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>>;
    async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Option<Booking>>;
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<CartLine>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<CartLine>>;
    async fn insert(&self, line: CartLineCreate) -> RepoResult<CartLine>;
    /// Delete `id` only if it belongs to `email`
    async fn delete_owned(&self, id: &str, email: &str) -> RepoResult<bool>;
}

/// Append-only payment history
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Delete the owner's cart lines listed in `payment.cart_items` and
    /// insert `payment`, as one transaction.
    ///
    /// Lines owned by another email or already gone are left out: the
    /// stored `cart_items` holds only the ids actually removed. A zero
    /// `quantity` is replaced by the number of removed lines. Returns the
    /// stored payment.
    async fn settle(&self, payment: Payment) -> RepoResult<Payment>;
    async fn find_all(&self) -> RepoResult<Vec<Payment>>;
}

/// Read-only menu
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<MenuItem>>;
    /// Used for seeding
    async fn insert(&self, item: MenuItem) -> RepoResult<MenuItem>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Role of `email`, `None` for unknown users or users without a role
    async fn find_role(&self, email: &str) -> RepoResult<Option<String>>;
    /// Fails with [`RepoError::Duplicate`] when the email is taken
    async fn insert(&self, user: UserCreate) -> RepoResult<User>;
    async fn set_role(&self, id: &str, role: &str) -> RepoResult<Option<User>>;
    async fn delete(&self, id: &str) -> RepoResult<bool>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Review>>;
    /// Used for seeding
    async fn insert(&self, review: Review) -> RepoResult<Review>;
}

/// User count, menu and payment history read at one point in time
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub users: u64,
    pub menu: Vec<MenuItem>,
    pub payments: Vec<Payment>,
}

/// Consistent read for the admin statistics
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// A write landing mid-read is either fully in the snapshot or not at all
    async fn snapshot(&self) -> RepoResult<StatsSnapshot>;
}

/// All repositories, injected into services and handlers
#[derive(Clone)]
pub struct Stores {
    pub capacity: Arc<dyn CapacityCatalog>,
    pub bookings: Arc<dyn ReservationLedger>,
    pub carts: Arc<dyn CartStore>,
    pub payments: Arc<dyn PaymentLedger>,
    pub menus: Arc<dyn MenuCatalog>,
    pub users: Arc<dyn UserDirectory>,
    pub reviews: Arc<dyn ReviewStore>,
    pub stats: Arc<dyn StatsSource>,
}

impl Stores {
    /// Every repository backed by one shared [`MemoryStore`]
    pub fn memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            capacity: store.clone(),
            bookings: store.clone(),
            carts: store.clone(),
            payments: store.clone(),
            menus: store.clone(),
            users: store.clone(),
            reviews: store.clone(),
            stats: store,
        }
    }

    /// SurrealDB-backed repositories sharing one connection
    pub fn surreal(db: Surreal<Db>) -> Self {
        Self {
            capacity: Arc::new(surreal::CapacityRepository::new(db.clone())),
            bookings: Arc::new(surreal::BookingRepository::new(db.clone())),
            carts: Arc::new(surreal::CartRepository::new(db.clone())),
            payments: Arc::new(surreal::PaymentRepository::new(db.clone())),
            menus: Arc::new(surreal::MenuRepository::new(db.clone())),
            users: Arc::new(surreal::UserRepository::new(db.clone())),
            reviews: Arc::new(surreal::ReviewRepository::new(db.clone())),
            stats: Arc::new(surreal::StatsRepository::new(db)),
        }
    }
}

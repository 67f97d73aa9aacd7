//! In-memory store
//!
//! Every table sits behind one `RwLock`, so each trait method is atomic
//! with respect to all others. Used by tests and `STORE_BACKEND=memory`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use shared::models::{
    AdmissionLimits, AdmissionOutcome, Booking, BookingStatus, CapacityOption, CartLine,
    CartLineCreate, MenuItem, Payment, RejectionReason, Review, User, UserCreate,
};
use shared::util::new_id;

use super::{
    CapacityCatalog, CartStore, MenuCatalog, PaymentLedger, RepoError, RepoResult,
    ReservationLedger, ReviewStore, StatsSnapshot, StatsSource, UserDirectory,
};

#[derive(Default)]
struct Tables {
    capacity: BTreeMap<u32, CapacityOption>,
    bookings: Vec<Booking>,
    carts: Vec<CartLine>,
    payments: Vec<Payment>,
    menus: Vec<MenuItem>,
    users: Vec<User>,
    reviews: Vec<Review>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a line back verbatim, id included
    #[cfg(test)]
    pub(crate) fn restore_cart_line(&self, line: CartLine) {
        self.tables.write().carts.push(line);
    }
}

#[async_trait]
impl CapacityCatalog for MemoryStore {
    async fn find_by_guests(&self, guests: u32) -> RepoResult<Option<CapacityOption>> {
        Ok(self.tables.read().capacity.get(&guests).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<CapacityOption>> {
        Ok(self.tables.read().capacity.values().cloned().collect())
    }

    async fn upsert(&self, option: CapacityOption) -> RepoResult<CapacityOption> {
        self.tables
            .write()
            .capacity
            .insert(option.guests, option.clone());
        Ok(option)
    }
}

#[async_trait]
impl ReservationLedger for MemoryStore {
    async fn count_by_slot(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> RepoResult<HashMap<String, u32>> {
        let tables = self.tables.read();
        let mut counts = HashMap::new();
        for b in tables
            .bookings
            .iter()
            .filter(|b| b.date == date && b.party_size == party_size && b.status.holds_seat())
        {
            *counts.entry(b.slot.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn admit(
        &self,
        booking: Booking,
        limits: AdmissionLimits,
    ) -> RepoResult<AdmissionOutcome> {
        let mut tables = self.tables.write();

        let today = tables
            .bookings
            .iter()
            .filter(|b| b.user_email == booking.user_email && b.booked_on == booking.booked_on)
            .count();
        if today >= limits.daily_limit as usize {
            return Ok(AdmissionOutcome::Rejected(
                RejectionReason::DailyLimitReached,
            ));
        }

        let taken = tables
            .bookings
            .iter()
            .filter(|b| {
                b.date == booking.date
                    && b.slot == booking.slot
                    && b.party_size == booking.party_size
                    && b.status.holds_seat()
            })
            .count();
        if taken >= limits.slot_capacity as usize {
            return Ok(AdmissionOutcome::Rejected(RejectionReason::SlotFull));
        }

        tables.bookings.push(booking.clone());
        Ok(AdmissionOutcome::Admitted(booking))
    }

    async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        Ok(self.tables.read().bookings.clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Booking>> {
        Ok(self
            .tables
            .read()
            .bookings
            .iter()
            .filter(|b| b.user_email == email)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        Ok(self
            .tables
            .read()
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Option<Booking>> {
        let mut tables = self.tables.write();
        Ok(tables.bookings.iter_mut().find(|b| b.id == id).map(|b| {
            b.status = status;
            b.clone()
        }))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.bookings.len();
        tables.bookings.retain(|b| b.id != id);
        Ok(tables.bookings.len() != before)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<CartLine>> {
        Ok(self.tables.read().carts.clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<CartLine>> {
        Ok(self
            .tables
            .read()
            .carts
            .iter()
            .filter(|c| c.user_email == email)
            .cloned()
            .collect())
    }

    async fn insert(&self, line: CartLineCreate) -> RepoResult<CartLine> {
        let line = CartLine {
            id: new_id(),
            user_email: line.user_email,
            menu_item_id: line.menu_item_id,
            name: line.name,
            image: line.image,
            price: line.price,
            quantity: line.quantity,
        };
        self.tables.write().carts.push(line.clone());
        Ok(line)
    }

    async fn delete_owned(&self, id: &str, email: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.carts.len();
        tables
            .carts
            .retain(|c| !(c.id == id && c.user_email == email));
        Ok(tables.carts.len() != before)
    }
}

#[async_trait]
impl PaymentLedger for MemoryStore {
    async fn settle(&self, mut payment: Payment) -> RepoResult<Payment> {
        let mut tables = self.tables.write();
        if tables.payments.iter().any(|p| p.id == payment.id) {
            return Err(RepoError::Duplicate(format!(
                "Payment {} already recorded",
                payment.id
            )));
        }

        let mut removed = Vec::new();
        tables.carts.retain(|c| {
            let settled = c.user_email == payment.user_email && payment.cart_items.contains(&c.id);
            if settled {
                removed.push(c.id.clone());
            }
            !settled
        });

        if payment.quantity == 0 {
            payment.quantity = removed.len() as u32;
        }
        payment.cart_items = removed;
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_all(&self) -> RepoResult<Vec<Payment>> {
        Ok(self.tables.read().payments.clone())
    }
}

#[async_trait]
impl MenuCatalog for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        Ok(self.tables.read().menus.clone())
    }

    async fn insert(&self, item: MenuItem) -> RepoResult<MenuItem> {
        let mut tables = self.tables.write();
        if tables.menus.iter().any(|m| m.id == item.id) {
            return Err(RepoError::Duplicate(format!("Menu item {}", item.id)));
        }
        tables.menus.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.tables.read().users.clone())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_role(&self, email: &str) -> RepoResult<Option<String>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .and_then(|u| u.role.clone()))
    }

    async fn insert(&self, user: UserCreate) -> RepoResult<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate(format!("User {}", user.email)));
        }
        let user = User {
            id: new_id(),
            name: user.name,
            email: user.email,
            photo: user.photo,
            role: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn set_role(&self, id: &str, role: &str) -> RepoResult<Option<User>> {
        let mut tables = self.tables.write();
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.role = Some(role.to_string());
            u.clone()
        }))
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() != before)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<Review>> {
        Ok(self.tables.read().reviews.clone())
    }

    async fn insert(&self, review: Review) -> RepoResult<Review> {
        self.tables.write().reviews.push(review.clone());
        Ok(review)
    }
}

#[async_trait]
impl StatsSource for MemoryStore {
    async fn snapshot(&self) -> RepoResult<StatsSnapshot> {
        let tables = self.tables.read();
        Ok(StatsSnapshot {
            users: tables.users.len() as u64,
            menu: tables.menus.clone(),
            payments: tables.payments.clone(),
        })
    }
}

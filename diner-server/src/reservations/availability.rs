//! Availability calculator
//!
//! `left = capacity - seat-holding bookings`, per configured slot. Only
//! slots with seats left are returned, in catalog order.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::SlotAvailability;

use super::CapacityCache;
use crate::db::repository::ReservationLedger;
use crate::utils::{AppError, AppResult, ErrorCode};

pub struct AvailabilityService {
    capacity: Arc<CapacityCache>,
    ledger: Arc<dyn ReservationLedger>,
}

impl AvailabilityService {
    pub fn new(capacity: Arc<CapacityCache>, ledger: Arc<dyn ReservationLedger>) -> Self {
        Self { capacity, ledger }
    }

    /// Open slots for `party_size` on `date`
    ///
    /// Fails with `CapacityOptionNotFound` when nothing is configured for
    /// the party size, which is distinct from an empty (fully booked) list.
    pub async fn get_availability(
        &self,
        party_size: u32,
        date: NaiveDate,
    ) -> AppResult<Vec<SlotAvailability>> {
        let option = self
            .capacity
            .get(party_size)
            .await?
            .filter(|o| !o.time_slots.is_empty())
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CapacityOptionNotFound,
                    format!("No booking options for {} guests", party_size),
                )
                .with_detail("guests", party_size)
            })?;

        let counts = self.ledger.count_by_slot(date, party_size).await?;

        let mut open = Vec::new();
        for slot in option.time_slots {
            let taken = counts.get(&slot.slot).copied().unwrap_or(0);
            if taken > slot.capacity {
                tracing::warn!(
                    date = %date,
                    slot = %slot.slot,
                    guests = party_size,
                    capacity = slot.capacity,
                    taken,
                    "Slot holds more bookings than its capacity"
                );
            }
            let left = slot.capacity.saturating_sub(taken);
            if left > 0 {
                open.push(SlotAvailability {
                    slot: slot.slot,
                    capacity: slot.capacity,
                    left,
                });
            }
        }
        Ok(open)
    }
}

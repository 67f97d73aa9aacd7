//! Booking admission controller
//!
//! Decides whether a booking request is admitted. The ledger performs the
//! check-and-insert as one conditional write; in addition, requests that
//! share a slot or a user-day are serialized here through [`KeyedLocks`].
//!
//! Rejections are a normal outcome, not an error: the caller should pick
//! another slot or day instead of retrying the same request.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{
    AdmissionLimits, AdmissionOutcome, Booking, BookingRejection, BookingRequest, BookingStatus,
};
use shared::util::{new_id, now_millis};

use super::KeyedLocks;
use super::locks::{slot_key, user_day_key};
use crate::db::repository::{CapacityCatalog, ReservationLedger};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Prune idle lock entries once the table grows past this
const LOCK_PRUNE_THRESHOLD: usize = 1024;

/// Result of a booking request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Admission {
    Accepted(Booking),
    Rejected(BookingRejection),
}

pub struct AdmissionController {
    catalog: Arc<dyn CapacityCatalog>,
    ledger: Arc<dyn ReservationLedger>,
    locks: KeyedLocks,
    daily_limit: u32,
}

impl AdmissionController {
    pub fn new(
        catalog: Arc<dyn CapacityCatalog>,
        ledger: Arc<dyn ReservationLedger>,
        daily_limit: u32,
    ) -> Self {
        Self {
            catalog,
            ledger,
            locks: KeyedLocks::new(),
            daily_limit,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Admit or reject `request` on behalf of `caller`
    ///
    /// `today` is the current business day and becomes `bookedOn`.
    pub async fn submit_booking(
        &self,
        caller: &str,
        request: BookingRequest,
        today: NaiveDate,
    ) -> AppResult<Admission> {
        if caller != request.user_email {
            return Err(AppError::identity_mismatch().with_detail("email", request.user_email));
        }
        if request.party_size == 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "guests must be at least 1",
            ));
        }
        if request.slot.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "slot is required",
            ));
        }

        let guard = self
            .locks
            .acquire(vec![
                slot_key(&request.date, &request.slot, request.party_size),
                user_day_key(&request.user_email, &today),
            ])
            .await;

        // capacity is re-read at admission, never from the availability cache
        let option = self
            .catalog
            .find_by_guests(request.party_size)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CapacityOptionNotFound,
                    format!("No booking options for {} guests", request.party_size),
                )
                .with_detail("guests", request.party_size)
            })?;
        let slot_capacity = option.capacity_of(&request.slot).ok_or_else(|| {
            AppError::new(ErrorCode::UnknownSlot).with_detail("slot", request.slot.clone())
        })?;

        let booking = Booking {
            id: new_id(),
            user_email: request.user_email,
            date: request.date,
            party_size: request.party_size,
            slot: request.slot,
            status: BookingStatus::Pending,
            booked_on: today,
            created_at: now_millis(),
        };
        let limits = AdmissionLimits {
            slot_capacity,
            daily_limit: self.daily_limit,
        };

        let outcome = self.ledger.admit(booking, limits).await;
        drop(guard);
        if self.locks.len() > LOCK_PRUNE_THRESHOLD {
            self.locks.prune();
        }

        match outcome? {
            AdmissionOutcome::Admitted(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    email = %booking.user_email,
                    date = %booking.date,
                    slot = %booking.slot,
                    guests = booking.party_size,
                    "Booking admitted"
                );
                Ok(Admission::Accepted(booking))
            }
            AdmissionOutcome::Rejected(reason) => {
                tracing::info!(email = %caller, ?reason, "Booking rejected");
                Ok(Admission::Rejected(reason.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::MemoryStore;
    use shared::models::{CapacityOption, RejectionReason, TimeSlot};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    async fn controller(capacity: u32, daily_limit: u32) -> (Arc<MemoryStore>, Arc<AdmissionController>) {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert(CapacityOption {
                guests: 4,
                time_slots: vec![
                    TimeSlot {
                        slot: "18:00".into(),
                        capacity,
                    },
                    TimeSlot {
                        slot: "20:00".into(),
                        capacity,
                    },
                ],
            })
            .await
            .unwrap();
        let controller = AdmissionController::new(store.clone(), store.clone(), daily_limit);
        (store, Arc::new(controller))
    }

    fn request(email: &str, slot: &str) -> BookingRequest {
        BookingRequest {
            user_email: email.into(),
            date: day(10),
            party_size: 4,
            slot: slot.into(),
        }
    }

    #[tokio::test]
    async fn test_caller_must_match_request_email() {
        let (_, controller) = controller(2, 2).await;
        let err = controller
            .submit_booking("mallory@x.io", request("a@x.io", "18:00"), day(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IdentityMismatch);
    }

    #[tokio::test]
    async fn test_admitted_booking_is_pending_and_stamped() {
        let (store, controller) = controller(2, 2).await;
        let admission = controller
            .submit_booking("a@x.io", request("a@x.io", "18:00"), day(1))
            .await
            .unwrap();
        let Admission::Accepted(booking) = admission else {
            panic!("expected admission, got {admission:?}");
        };
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booked_on, day(1));
        assert_eq!(booking.date, day(10));
        assert_eq!(store.find_by_id(&booking.id).await.unwrap(), Some(booking));
    }

    #[tokio::test]
    async fn test_unknown_slot_and_party_size() {
        let (_, controller) = controller(2, 2).await;
        let err = controller
            .submit_booking("a@x.io", request("a@x.io", "23:00"), day(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownSlot);

        let mut req = request("a@x.io", "18:00");
        req.party_size = 9;
        let err = controller.submit_booking("a@x.io", req, day(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityOptionNotFound);
    }

    #[tokio::test]
    async fn test_daily_limit_rejects_the_third_booking() {
        let (_, controller) = controller(10, 2).await;
        for slot in ["18:00", "20:00"] {
            let admission = controller
                .submit_booking("a@x.io", request("a@x.io", slot), day(1))
                .await
                .unwrap();
            assert!(matches!(admission, Admission::Accepted(_)));
        }
        let admission = controller
            .submit_booking("a@x.io", request("a@x.io", "18:00"), day(1))
            .await
            .unwrap();
        assert_eq!(
            admission,
            Admission::Rejected(RejectionReason::DailyLimitReached.into())
        );

        // a new business day resets the count
        let admission = controller
            .submit_booking("a@x.io", request("a@x.io", "18:00"), day(2))
            .await
            .unwrap();
        assert!(matches!(admission, Admission::Accepted(_)));
    }

    #[tokio::test]
    async fn test_concurrent_admission_never_exceeds_capacity() {
        let (store, controller) = controller(3, 2).await;
        let tasks = (0..12).map(|i| {
            let controller = controller.clone();
            tokio::spawn(async move {
                let email = format!("guest{i}@x.io");
                controller
                    .submit_booking(&email, request(&email, "18:00"), day(1))
                    .await
            })
        });

        let mut accepted = 0;
        let mut slot_full = 0;
        for result in futures::future::join_all(tasks).await {
            match result.unwrap().unwrap() {
                Admission::Accepted(_) => accepted += 1,
                Admission::Rejected(r) => {
                    assert_eq!(r.reason, RejectionReason::SlotFull);
                    assert!(!r.over_booking);
                    slot_full += 1;
                }
            }
        }
        assert_eq!(accepted, 3);
        assert_eq!(slot_full, 9);
        let counts = store.count_by_slot(day(10), 4).await.unwrap();
        assert_eq!(counts.get("18:00"), Some(&3));
    }
}

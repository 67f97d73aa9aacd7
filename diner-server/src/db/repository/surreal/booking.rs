//! Booking Repository
//!
//! Admission runs as one SurrealQL transaction: both guards are evaluated
//! and the record created inside the same `BEGIN ... COMMIT` block, and a
//! failed guard aborts it with a `THROW` marker.
//!
//! Every admission also upserts two `admission_guard` rows, one per
//! (date, slot, guests) and one per (email, bookedOn). Two concurrent
//! admissions touching the same slot or the same day therefore write the
//! same key and cannot both commit; the loser is retried from scratch and
//! sees the winner's booking.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{AdmissionLimits, AdmissionOutcome, Booking, BookingStatus, RejectionReason};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, UidRow, error_mentions};
use crate::db::repository::{RepoResult, ReservationLedger};

const OVER_BOOKING: &str = "over_booking";
const SLOT_FULL: &str = "slot_full";

/// Commit failures SurrealDB reports as retryable
const CONFLICT_MARKERS: [&str; 2] = ["read or write conflict", "can be retried"];
const MAX_ADMIT_ATTEMPTS: u32 = 8;
const RETRY_BACKOFF: Duration = Duration::from_millis(5);

const ADMIT_QUERY: &str = r#"
BEGIN TRANSACTION;
LET $today = array::len((SELECT VALUE uid FROM booking WHERE email = $email AND bookedOn = $booked_on));
IF $today >= $daily_limit { THROW "over_booking"; };
LET $taken = array::len((SELECT VALUE uid FROM booking WHERE date = $date AND slot = $slot AND guests = $guests AND status != 'cancelled'));
IF $taken >= $capacity { THROW "slot_full"; };
UPSERT type::thing('admission_guard', ['day', $email, $booked_on]) SET admitted = $today + 1 RETURN NONE;
UPSERT type::thing('admission_guard', ['slot', $date, $slot, $guests]) SET admitted = $taken + 1 RETURN NONE;
CREATE type::thing('booking', $uid) SET
    uid = $uid,
    email = $email,
    date = $date,
    guests = $guests,
    slot = $slot,
    status = $status,
    bookedOn = $booked_on,
    createdAt = $created_at
RETURN NONE;
COMMIT TRANSACTION;
"#;

#[derive(Debug, Deserialize)]
struct SlotCount {
    slot: String,
    count: u32,
}

fn is_conflict(err: &surrealdb::Error) -> bool {
    CONFLICT_MARKERS
        .iter()
        .any(|marker| error_mentions(err, marker))
}

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One run of [`ADMIT_QUERY`]
    async fn try_admit(
        &self,
        booking: &Booking,
        limits: AdmissionLimits,
    ) -> Result<AdmissionOutcome, surrealdb::Error> {
        let mut response = self
            .base
            .db()
            .query(ADMIT_QUERY)
            .bind(("uid", booking.id.clone()))
            .bind(("email", booking.user_email.clone()))
            .bind(("date", booking.date.to_string()))
            .bind(("guests", booking.party_size))
            .bind(("slot", booking.slot.clone()))
            .bind(("status", booking.status.as_str()))
            .bind(("booked_on", booking.booked_on.to_string()))
            .bind(("created_at", booking.created_at))
            .bind(("daily_limit", limits.daily_limit))
            .bind(("capacity", limits.slot_capacity))
            .await?;

        let errors = response.take_errors();
        if errors.values().any(|e| error_mentions(e, OVER_BOOKING)) {
            return Ok(AdmissionOutcome::Rejected(
                RejectionReason::DailyLimitReached,
            ));
        }
        if errors.values().any(|e| error_mentions(e, SLOT_FULL)) {
            return Ok(AdmissionOutcome::Rejected(RejectionReason::SlotFull));
        }
        if let Some(err) = errors.into_values().next() {
            return Err(err);
        }
        Ok(AdmissionOutcome::Admitted(booking.clone()))
    }
}

#[async_trait]
impl ReservationLedger for BookingRepository {
    async fn count_by_slot(
        &self,
        date: NaiveDate,
        party_size: u32,
    ) -> RepoResult<HashMap<String, u32>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT slot, count() AS count FROM booking \
                 WHERE date = $date AND guests = $guests AND status != 'cancelled' \
                 GROUP BY slot",
            )
            .bind(("date", date.to_string()))
            .bind(("guests", party_size))
            .await?;
        let rows: Vec<SlotCount> = result.take(0)?;
        Ok(rows.into_iter().map(|r| (r.slot, r.count)).collect())
    }

    async fn admit(
        &self,
        booking: Booking,
        limits: AdmissionLimits,
    ) -> RepoResult<AdmissionOutcome> {
        let mut attempt = 1;
        loop {
            match self.try_admit(&booking, limits).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if is_conflict(&err) && attempt < MAX_ADMIT_ATTEMPTS => {
                    tracing::debug!(
                        booking_id = %booking.id,
                        slot = %booking.slot,
                        attempt,
                        "Admission transaction conflicted, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * OMIT id FROM booking ORDER BY createdAt")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM booking WHERE email = $email ORDER BY createdAt")
            .bind(("email", email.to_string()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings)
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * OMIT id FROM booking WHERE uid = $uid LIMIT 1")
            .bind(("uid", id.to_string()))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings.into_iter().next())
    }

    async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Option<Booking>> {
        self.base
            .db()
            .query("UPDATE booking SET status = $status WHERE uid = $uid RETURN NONE")
            .bind(("uid", id.to_string()))
            .bind(("status", status.as_str()))
            .await?
            .check()?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE booking WHERE uid = $uid RETURN BEFORE")
            .bind(("uid", id.to_string()))
            .await?;
        let removed: Vec<UidRow> = result.take(0)?;
        Ok(!removed.is_empty())
    }
}

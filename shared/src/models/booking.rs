//! Booking Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status occupies a seat in its slot
    pub fn holds_seat(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Table booking (订座)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(rename = "email")]
    pub user_email: String,
    /// Calendar day of the visit
    pub date: NaiveDate,
    #[serde(rename = "guests")]
    pub party_size: u32,
    pub slot: String,
    pub status: BookingStatus,
    /// Server calendar day on which the booking was made
    pub booked_on: NaiveDate,
    /// Unix millis
    pub created_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "email")]
    pub user_email: String,
    pub date: NaiveDate,
    #[serde(rename = "guests")]
    pub party_size: u32,
    pub slot: String,
}

/// Limits the ledger enforces atomically when admitting a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionLimits {
    /// Seats configured for the requested slot
    pub slot_capacity: u32,
    /// Max bookings one user may create per calendar day
    pub daily_limit: u32,
}

/// Why an admission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    DailyLimitReached,
    SlotFull,
}

impl RejectionReason {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DailyLimitReached => ErrorCode::DailyBookingLimitReached,
            Self::SlotFull => ErrorCode::SlotFull,
        }
    }
}

/// Result of a conditional ledger insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Admitted(Booking),
    Rejected(RejectionReason),
}

/// Structured rejection body returned with HTTP 200
///
/// `overBooking` keeps the field the web client already branches on.
/// `code` and `message` carry the same error code a 409 would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRejection {
    pub rejected: bool,
    pub over_booking: bool,
    pub reason: RejectionReason,
    pub code: ErrorCode,
    pub message: String,
}

impl From<RejectionReason> for BookingRejection {
    fn from(reason: RejectionReason) -> Self {
        let code = reason.error_code();
        Self {
            rejected: true,
            over_booking: reason == RejectionReason::DailyLimitReached,
            reason,
            code,
            message: code.message().to_string(),
        }
    }
}

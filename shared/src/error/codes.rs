//! Unified error codes for the Diner Dynasty backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors (users)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Caller acts on behalf of another identity
    IdentityMismatch = 2006,

    // ==================== 3xxx: Booking ====================
    /// No capacity option configured for the party size
    CapacityOptionNotFound = 3001,
    /// Slot is not part of the party size's capacity option
    UnknownSlot = 3002,
    /// Slot has no seats left
    SlotFull = 3003,
    /// User reached the per-day booking limit
    DailyBookingLimitReached = 3004,
    /// Booking not found
    BookingNotFound = 3005,
    /// Booking is not in a state that allows the transition
    BookingInvalidState = 3006,

    // ==================== 5xxx: Payment ====================
    /// Payment amount is invalid
    InvalidAmount = 5002,
    /// Upstream payment gateway failed
    PaymentGatewayError = 5003,
    /// Upstream payment gateway is not configured
    PaymentGatewayNotConfigured = 5004,

    // ==================== 6xxx: Catalog ====================
    /// User not found
    UserNotFound = 6101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether the caller may retry the same request unchanged
    ///
    /// Admission conflicts are not retryable as-is: the caller has to pick
    /// another slot or day. Dependency failures are.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::DatabaseError | ErrorCode::PaymentGatewayError
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Unauthorized access",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Forbidden access",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::IdentityMismatch => "Forbidden access",

            // Booking
            ErrorCode::CapacityOptionNotFound => "No booking options for this party size",
            ErrorCode::UnknownSlot => "Time slot is not offered for this party size",
            ErrorCode::SlotFull => "Time slot is fully booked",
            ErrorCode::DailyBookingLimitReached => "Daily booking limit reached",
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingInvalidState => "Booking state does not allow this action",

            // Payment
            ErrorCode::InvalidAmount => "Payment amount is invalid",
            ErrorCode::PaymentGatewayError => "Payment gateway request failed",
            ErrorCode::PaymentGatewayNotConfigured => "Payment gateway is not configured",

            // Catalog
            ErrorCode::UserNotFound => "User not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::IdentityMismatch),

            // Booking
            3001 => Ok(ErrorCode::CapacityOptionNotFound),
            3002 => Ok(ErrorCode::UnknownSlot),
            3003 => Ok(ErrorCode::SlotFull),
            3004 => Ok(ErrorCode::DailyBookingLimitReached),
            3005 => Ok(ErrorCode::BookingNotFound),
            3006 => Ok(ErrorCode::BookingInvalidState),

            // Payment
            5002 => Ok(ErrorCode::InvalidAmount),
            5003 => Ok(ErrorCode::PaymentGatewayError),
            5004 => Ok(ErrorCode::PaymentGatewayNotConfigured),

            // Catalog
            6101 => Ok(ErrorCode::UserNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

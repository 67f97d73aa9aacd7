//! Shared types for the Diner Dynasty backend
//!
//! Common types used by the server crate and its tests: domain models,
//! the error-code system and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

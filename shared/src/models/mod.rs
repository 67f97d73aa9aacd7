//! Data models
//!
//! Shared between diner-server and frontend (via API).
//! JSON field names follow the web client (`email`, `guests`, `cartItems`, ...).
//! All IDs are opaque strings (simple UUIDs) assigned by the server.

pub mod booking;
pub mod capacity;
pub mod cart;
pub mod menu;
pub mod payment;
pub mod review;
pub mod stats;
pub mod user;

// Re-exports
pub use booking::*;
pub use capacity::*;
pub use cart::*;
pub use menu::*;
pub use payment::*;
pub use review::*;
pub use stats::*;
pub use user::*;

//! Reservation Module
//!
//! - **capacity_cache**: short-lived cache over the capacity catalog
//! - **availability**: remaining seats per slot for a party size and date
//! - **locks**: keyed async mutexes serializing admission per key
//! - **admission**: booking admission under slot capacity and the daily limit
//!
//! # Data Flow
//!
//! ```text
//! GET /booking-options → AvailabilityService → CapacityCache → CapacityCatalog
//!                                            ↘ ReservationLedger::count_by_slot
//!
//! POST /bookings → AdmissionController → KeyedLocks (slot key, user-day key)
//!                                      → CapacityCatalog (uncached)
//!                                      → ReservationLedger::admit (conditional insert)
//! ```

pub mod admission;
pub mod availability;
pub mod capacity_cache;
pub mod locks;

pub use admission::{Admission, AdmissionController};
pub use availability::AvailabilityService;
pub use capacity_cache::CapacityCache;
pub use locks::KeyedLocks;

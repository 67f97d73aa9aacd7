//! Payment Module
//!
//! - **reconciler**: records a payment and removes the cart lines it
//!   settles as one unit, plus the straggler sweep
//! - **gateway**: upstream payment-intent creation

pub mod gateway;
pub mod reconciler;

pub use gateway::{PaymentGateway, StripeGateway};
pub use reconciler::PaymentReconciler;

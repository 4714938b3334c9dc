//! API handlers.

pub mod health;
pub mod payments;
pub mod pricing;
pub mod provider;
pub mod rentals;
pub mod services;
pub mod users;
pub mod verifications;

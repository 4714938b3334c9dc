//! Core types and utilities for numbox.
//!
//! This crate provides the foundational types used throughout the numbox platform:
//!
//! - **Identifiers**: `UserId`, `ServiceId`, `TransactionId`, `VerificationId`, `RentalId`
//! - **Users**: `User` with credit balance and profile fields
//! - **Ledger**: `Transaction`, `TransactionKind`, `PaymentRecord`
//! - **Catalog**: `Service`
//! - **Numbers**: `Verification`, `Rental`
//! - **Pricing**: `ServiceType`, `PricingSetting`, credit packages
//!
//! # Credit Unit
//!
//! **1 credit = $0.01 (1 cent)**
//!
//! - User buys the $10 package → balance rises by 1000 cents
//! - A $0.25 verification → deducts 25 cents
//! - Stored as `i64` (integer cents) to avoid floating point precision issues

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod payment;
pub mod pricing;
pub mod rental;
pub mod service;
pub mod transaction;
pub mod user;
pub mod verification;

pub use ids::{IdError, RentalId, ServiceId, TransactionId, UserId, VerificationId};
pub use payment::PaymentRecord;
pub use pricing::{
    cents_to_dollars, dollars_to_cents, format_usd, PricingSetting, ServiceType, ServiceTypeError,
    CREDIT_PACKAGES,
};
pub use rental::{Rental, RentalKind, RentalStatus, MAX_RENTAL_DAYS, MIN_RENTAL_DAYS};
pub use service::Service;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use user::User;
pub use verification::{Verification, VerificationStatus, VERIFICATION_WINDOW_SECS};

//! Stripe integration for credit purchases.
//!
//! Stripe handles:
//! - Payment intent creation for the fixed credit packages
//! - Server-side payment verification before credits are granted

pub mod client;
pub mod types;

pub use client::StripeClient;
pub use client::StripeError;
pub use types::*;

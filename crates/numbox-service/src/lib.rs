//! Numbox HTTP API Service.
//!
//! This crate provides the HTTP API for numbox, including:
//!
//! - User accounts and credit balances
//! - The verification catalog and SMS verification purchases
//! - Phone number rentals
//! - Credit purchases via Stripe
//! - Admin pricing management
//!
//! # Authentication
//!
//! The service supports three authentication methods:
//!
//! 1. **JWT tokens** - For end-user requests (storefront, dashboard)
//! 2. **Provider API key** - For inbound SMS deliveries from the number provider
//! 3. **Admin API key** - For pricing management

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod provider;
pub mod routes;
pub mod seed;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use provider::{NumberProvider, NumberSpec, ProviderError, StubProvider};
pub use routes::create_router;
pub use seed::seed_store;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};

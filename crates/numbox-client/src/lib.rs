//! Numbox Client SDK.
//!
//! This crate provides a client library for interacting with the numbox API
//! on behalf of an authenticated user.
//!
//! # Example
//!
//! ```no_run
//! use numbox_client::{NumboxClient, RentalKind};
//!
//! # async fn example() -> Result<(), numbox_client::ClientError> {
//! let client = NumboxClient::new("http://numbox:8080", "user-jwt");
//!
//! // Buy a verification for the first catalog service
//! let services = client.services().await?;
//! let verification = client.create_verification(&services[0].id).await?;
//! println!("Awaiting code on {:?}", verification.phone_number);
//!
//! // Rent a number for a month
//! let rental = client.create_rental(RentalKind::Renewable, 30).await?;
//! println!("Rented {} until {}", rental.phone_number, rental.expires_at);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, NumboxClient};
pub use error::ClientError;
pub use types::*;

pub use numbox_core::{RentalKind, ServiceType};

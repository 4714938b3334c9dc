//! Upstream number-provider integration.
//!
//! Every verification and rental is backed by a phone number leased from an
//! upstream SMS provider. The [`NumberProvider`] trait is the seam between
//! the purchase handlers and that provider; handlers call it before touching
//! the store so a provider failure leaves no partial state behind.

mod stub;

pub use stub::StubProvider;

use async_trait::async_trait;

/// What kind of number the caller needs.
#[derive(Debug, Clone)]
pub enum NumberSpec {
    /// A short-lived number for a single verification.
    Verification {
        /// Slug of the service the code is expected from.
        service_slug: String,
    },
    /// A number rented for a fixed duration.
    Rental {
        /// Rental length in days.
        duration_days: u32,
    },
}

/// Errors from the upstream number provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider could not be reached or returned a failure.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request (no inventory, unsupported service).
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

/// A source of phone numbers.
#[async_trait]
pub trait NumberProvider: Send + Sync {
    /// Lease a phone number matching `spec`.
    ///
    /// Returns the number in display form, e.g. `+1 (555) 123-4567`.
    async fn assign_number(&self, spec: &NumberSpec) -> Result<String, ProviderError>;
}

impl From<ProviderError> for crate::error::ApiError {
    fn from(err: ProviderError) -> Self {
        tracing::warn!(error = %err, "Number provider request failed");
        Self::ExternalService("Number provider is unavailable".into())
    }
}

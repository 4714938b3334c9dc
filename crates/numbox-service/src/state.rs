//! Application state.

use std::sync::Arc;

use numbox_store::Store;

use crate::config::ServiceConfig;
use crate::provider::{NumberProvider, StubProvider};
use crate::stripe::StripeClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Upstream number provider.
    pub provider: Arc<dyn NumberProvider>,

    /// Stripe client for payments (optional).
    pub stripe: Option<Arc<StripeClient>>,
}

impl AppState {
    /// Create a new application state with the stub number provider.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        Self::with_provider(store, config, Arc::new(StubProvider))
    }

    /// Create a new application state with an explicit number provider.
    #[must_use]
    pub fn with_provider(
        store: Arc<dyn Store>,
        config: ServiceConfig,
        provider: Arc<dyn NumberProvider>,
    ) -> Self {
        // Create Stripe client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            tracing::info!("Stripe integration enabled");
            Arc::new(StripeClient::new(key))
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - credit purchases will not be available");
        }

        Self {
            store,
            config,
            provider,
            stripe,
        }
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}

//! Catalog service types for numbox.
//!
//! This module defines the verification catalog: the external services
//! (Google, Tinder, PayPal, ...) users can receive SMS codes for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ServiceId;

/// A catalog entry for a verifiable external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique service ID.
    pub id: ServiceId,

    /// Display name, e.g. `"Google"`.
    pub name: String,

    /// URL-safe unique slug, e.g. `"google"`.
    pub slug: String,

    /// Logo URL, if any.
    pub logo_url: Option<String>,

    /// Category, e.g. `"Social Media"`.
    pub category: Option<String>,

    /// Price of one verification against this service, in cents.
    pub base_price_cents: i64,

    /// Whether the service is offered in listings.
    ///
    /// Inactive services are hidden from the catalog list but remain
    /// purchasable by ID.
    pub is_active: bool,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Create a new active catalog entry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        category: impl Into<String>,
        base_price_cents: i64,
    ) -> Self {
        Self {
            id: ServiceId::generate(),
            name: name.into(),
            slug: slug.into(),
            logo_url: None,
            category: Some(category.into()),
            base_price_cents,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

//! Pricing types for numbox.
//!
//! This module defines the admin-editable pricing settings, the credit
//! package allow-list, and the dollars/cents conversions used at the API
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Credit packages offered for purchase, in whole US dollars.
///
/// Payment intents are only created for these amounts.
pub const CREDIT_PACKAGES: [i64; 5] = [5, 10, 25, 50, 100];

/// The product categories that carry a base price.
///
/// `Verification` exists for display parity; verification purchases snapshot
/// the per-service catalog price, while both rental flavors price from this
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// One-time SMS verification.
    Verification,

    /// Fixed-term number rental.
    NonRenewableRental,

    /// Monthly renewable number rental.
    RenewableRental,
}

impl ServiceType {
    /// Stable string key, used as the storage key and URL segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::NonRenewableRental => "non_renewable_rental",
            Self::RenewableRental => "renewable_rental",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ServiceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verification" => Ok(Self::Verification),
            "non_renewable_rental" => Ok(Self::NonRenewableRental),
            "renewable_rental" => Ok(Self::RenewableRental),
            other => Err(ServiceTypeError::Unknown(other.to_string())),
        }
    }
}

/// Error parsing a service type key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceTypeError {
    /// The input names no known service type.
    #[error("unknown service type: {0}")]
    Unknown(String),
}

/// An admin-editable base price for one product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSetting {
    /// Which product category this row prices.
    pub service_type: ServiceType,

    /// Base price in cents.
    pub base_price_cents: i64,

    /// Human-readable description shown in the storefront.
    pub description: Option<String>,

    /// When the price was last changed.
    pub updated_at: DateTime<Utc>,
}

impl PricingSetting {
    /// Create a new pricing setting.
    #[must_use]
    pub fn new(
        service_type: ServiceType,
        base_price_cents: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            service_type,
            base_price_cents,
            description: Some(description.into()),
            updated_at: Utc::now(),
        }
    }
}

/// Convert a dollar amount to integer cents, rounding to two decimals.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Convert integer cents to a dollar amount.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format integer cents as a dollar string, e.g. `425` → `"$4.25"`.
#[must_use]
pub fn format_usd(cents: i64) -> String {
    format!("${:.2}", cents_to_dollars(cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_keys_roundtrip() {
        for ty in [
            ServiceType::Verification,
            ServiceType::NonRenewableRental,
            ServiceType::RenewableRental,
        ] {
            let parsed: ServiceType = ty.as_str().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn service_type_rejects_unknown() {
        let err = "weekly_rental".parse::<ServiceType>().unwrap_err();
        assert_eq!(err, ServiceTypeError::Unknown("weekly_rental".into()));
    }

    #[test]
    fn service_type_serde_matches_keys() {
        let json = serde_json::to_string(&ServiceType::NonRenewableRental).unwrap();
        assert_eq!(json, "\"non_renewable_rental\"");
    }

    #[test]
    fn dollars_to_cents_rounds() {
        assert_eq!(dollars_to_cents(0.25), 25);
        assert_eq!(dollars_to_cents(1.50), 150);
        assert_eq!(dollars_to_cents(7.005), 701);
        assert_eq!(dollars_to_cents(100.0), 10_000);
    }

    #[test]
    fn format_usd_two_decimals() {
        assert_eq!(format_usd(25), "$0.25");
        assert_eq!(format_usd(150), "$1.50");
        assert_eq!(format_usd(10_000), "$100.00");
    }

    #[test]
    fn credit_packages_are_the_storefront_tiers() {
        assert_eq!(CREDIT_PACKAGES, [5, 10, 25, 50, 100]);
    }
}

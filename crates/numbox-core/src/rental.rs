//! Rental types for numbox.
//!
//! A rental is a phone number held for days to months, priced from the
//! admin-editable pricing settings rather than the per-service catalog.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{RentalId, ServiceType, UserId};

/// Shortest allowed rental, in days.
pub const MIN_RENTAL_DAYS: u32 = 1;

/// Longest allowed rental, in days.
pub const MAX_RENTAL_DAYS: u32 = 365;

/// A rented phone number.
///
/// The price is a snapshot of the pricing setting at purchase time. Records
/// keep their stored status past `expires_at`; nothing sweeps them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rental {
    /// Unique rental ID (ULID for time-ordering).
    pub id: RentalId,

    /// The user renting the number.
    pub user_id: UserId,

    /// The rented phone number.
    pub phone_number: String,

    /// Renewable or one-shot.
    #[serde(rename = "type")]
    pub kind: RentalKind,

    /// Rental length in days.
    pub duration_days: u32,

    /// When the rental began.
    pub start_date: DateTime<Utc>,

    /// When the rental lapses: `start_date + duration_days`.
    pub expires_at: DateTime<Utc>,

    /// Whether the rental renews itself. Derived from `kind`.
    pub auto_renew: bool,

    /// Price paid, in cents (snapshot at purchase time).
    pub price_cents: i64,

    /// Current lifecycle state.
    pub status: RentalStatus,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Rental {
    /// Create a new active rental starting now.
    ///
    /// `expires_at` is exactly `duration_days` after the start, and
    /// `auto_renew` is on iff the rental is renewable.
    #[must_use]
    pub fn new(
        user_id: UserId,
        kind: RentalKind,
        duration_days: u32,
        price_cents: i64,
        phone_number: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RentalId::generate(),
            user_id,
            phone_number,
            kind,
            duration_days,
            start_date: now,
            expires_at: now + Duration::days(i64::from(duration_days)),
            auto_renew: kind == RentalKind::Renewable,
            price_cents,
            status: RentalStatus::Active,
            created_at: now,
        }
    }

    /// Check whether the rental period has lapsed.
    #[must_use]
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Rental flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalKind {
    /// Fixed-term rental that simply lapses.
    NonRenewable,

    /// Monthly rental that renews until cancelled.
    Renewable,
}

impl RentalKind {
    /// The pricing setting this flavor is priced from.
    #[must_use]
    pub const fn pricing_type(&self) -> ServiceType {
        match self {
            Self::NonRenewable => ServiceType::NonRenewableRental,
            Self::Renewable => ServiceType::RenewableRental,
        }
    }

    /// Human-readable label used in ledger descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NonRenewable => "Non-renewable",
            Self::Renewable => "Renewable",
        }
    }
}

/// Lifecycle state of a rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// The number is held.
    Active,

    /// The rental period ended.
    Expired,

    /// The user gave the number up early.
    Cancelled,
}

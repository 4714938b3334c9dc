//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Ledger transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by user, keyed by `user_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// Processed payment intents for idempotency, keyed by intent ID.
    pub const PAYMENTS: &str = "payments";

    /// Catalog services, keyed by `service_id`.
    pub const SERVICES: &str = "services";

    /// Index: unique service slugs, keyed by slug. Value is the service ID.
    pub const SERVICES_BY_SLUG: &str = "services_by_slug";

    /// Verification records, keyed by `verification_id` (ULID).
    pub const VERIFICATIONS: &str = "verifications";

    /// Index: verifications by user, keyed by `user_id || verification_id`.
    /// Value is empty (index only).
    pub const VERIFICATIONS_BY_USER: &str = "verifications_by_user";

    /// Rental records, keyed by `rental_id` (ULID).
    pub const RENTALS: &str = "rentals";

    /// Index: rentals by user, keyed by `user_id || rental_id`.
    /// Value is empty (index only).
    pub const RENTALS_BY_USER: &str = "rentals_by_user";

    /// Pricing settings, keyed by the service-type string.
    pub const PRICING: &str = "pricing";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::PAYMENTS,
        cf::SERVICES,
        cf::SERVICES_BY_SLUG,
        cf::VERIFICATIONS,
        cf::VERIFICATIONS_BY_USER,
        cf::RENTALS,
        cf::RENTALS_BY_USER,
        cf::PRICING,
    ]
}

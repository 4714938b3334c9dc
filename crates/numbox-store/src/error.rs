//! Error types for numbox storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record, e.g. `"user"`.
        entity: &'static str,
        /// The record's identifier.
        id: String,
    },

    /// A record with the same unique key already exists.
    #[error("{entity} already exists: {id}")]
    AlreadyExists {
        /// The kind of record, e.g. `"service"`.
        entity: &'static str,
        /// The conflicting key.
        id: String,
    },

    /// Insufficient credits for a deduction.
    #[error("insufficient credits: balance={balance_cents}, required={required_cents}")]
    InsufficientCredits {
        /// Current balance in cents.
        balance_cents: i64,
        /// Required amount in cents.
        required_cents: i64,
    },

    /// Payment intent already credited (idempotency check failed).
    #[error("duplicate payment: {payment_intent_id}")]
    DuplicatePayment {
        /// The payment intent ID that was replayed.
        payment_intent_id: String,
    },
}

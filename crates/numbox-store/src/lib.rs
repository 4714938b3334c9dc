//! `RocksDB` storage layer for numbox.
//!
//! This crate provides persistent storage for users, the credit ledger, the
//! verification catalog, verifications, rentals, pricing settings, and
//! processed payments, using `RocksDB` with column families for efficient
//! indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `users`: Primary user records, keyed by `user_id`
//! - `transactions`: Ledger transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: Index for listing transactions by user
//! - `payments`: Processed payment intents for idempotency, keyed by intent ID
//! - `services`: Catalog entries, keyed by `service_id`
//! - `services_by_slug`: Unique-slug index, value is the service ID
//! - `verifications` / `verifications_by_user`: Verification records + user index
//! - `rentals` / `rentals_by_user`: Rental records + user index
//! - `pricing`: Pricing settings, keyed by service-type string
//!
//! Every balance mutation goes through a compound operation that writes the
//! balance change and its ledger transaction in one `WriteBatch`, so a debit
//! can never be observed without its log entry.
//!
//! # Example
//!
//! ```no_run
//! use numbox_store::{RocksStore, Store};
//! use numbox_core::{User, UserId};
//!
//! let store = RocksStore::open("/tmp/numbox-db").unwrap();
//!
//! // Create a user
//! let user_id = UserId::generate();
//! let user = User::new(user_id);
//! store.put_user(&user).unwrap();
//!
//! // Get balance
//! let retrieved = store.get_user(&user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use numbox_core::{
    PaymentRecord, PricingSetting, Rental, RentalId, Service, ServiceId, ServiceType, Transaction,
    TransactionId, User, UserId, Verification, VerificationId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so handlers depend on the interface
/// rather than the `RocksDB` implementation, allowing substitute backends in
/// tests.
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or update a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Insert a ledger transaction.
    ///
    /// This also maintains the user index. Balance-changing paths should use
    /// the compound operations instead, which pair the transaction with its
    /// balance update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>>;

    /// List transactions for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    // =========================================================================
    // Payment Operations (for idempotency)
    // =========================================================================

    /// Check if a payment intent has already been credited.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_payment(&self, payment_intent_id: &str) -> Result<bool>;

    /// Get a processed payment by intent ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment(&self, payment_intent_id: &str) -> Result<Option<PaymentRecord>>;

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Insert a catalog service, enforcing slug uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if a service with the same slug
    /// exists.
    fn create_service(&self, service: &Service) -> Result<()>;

    /// Get a catalog service by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_service(&self, service_id: &ServiceId) -> Result<Option<Service>>;

    /// List active catalog services, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_active_services(&self) -> Result<Vec<Service>>;

    // =========================================================================
    // Verification Operations
    // =========================================================================

    /// Get a verification by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_verification(&self, verification_id: &VerificationId)
        -> Result<Option<Verification>>;

    /// List verifications for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_verifications_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Verification>>;

    /// Update a stored verification (code arrival, status changes).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the verification was never created.
    fn put_verification(&self, verification: &Verification) -> Result<()>;

    // =========================================================================
    // Rental Operations
    // =========================================================================

    /// Get a rental by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_rental(&self, rental_id: &RentalId) -> Result<Option<Rental>>;

    /// List rentals for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_rentals_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Rental>>;

    // =========================================================================
    // Pricing Operations
    // =========================================================================

    /// Get the pricing setting for a service type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_pricing_setting(&self, service_type: ServiceType) -> Result<Option<PricingSetting>>;

    /// Insert or update a pricing setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_pricing_setting(&self, setting: &PricingSetting) -> Result<()>;

    /// List all pricing settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_pricing_settings(&self) -> Result<Vec<PricingSetting>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Purchase a verification: debit credits, store the verification, and
    /// record the transaction atomically.
    ///
    /// Returns the new balance after deduction. On any error nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low.
    fn debit_for_verification(
        &self,
        verification: &Verification,
        transaction: &Transaction,
    ) -> Result<i64>;

    /// Purchase a rental: debit credits, store the rental, and record the
    /// transaction atomically.
    ///
    /// Returns the new balance after deduction. On any error nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low.
    fn debit_for_rental(&self, rental: &Rental, transaction: &Transaction) -> Result<i64>;

    /// Apply a confirmed payment: credit the balance, mark the intent as
    /// processed, and record the transaction atomically.
    ///
    /// Returns the new balance after addition. Replaying an already-credited
    /// intent fails without writing anything, so one intent credits at most
    /// once.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::DuplicatePayment` if the intent was already credited.
    fn credit_purchase(&self, payment: &PaymentRecord, transaction: &Transaction) -> Result<i64>;
}

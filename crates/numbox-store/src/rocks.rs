//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use numbox_core::{
    PaymentRecord, PricingSetting, Rental, RentalId, Service, ServiceId, ServiceType, Transaction,
    TransactionId, User, UserId, Verification, VerificationId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-modify-write balance updates so two concurrent
    /// purchases cannot both read the same starting balance. Point reads and
    /// index scans do not take this lock.
    balance_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            balance_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and deserialize a single record.
    fn read<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Serialize and write a single record.
    fn write<T: serde::Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let data = Self::serialize(value)?;
        self.db
            .put_cf(&cf, key, data)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Commit a write batch.
    fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Take the balance lock for a read-modify-write sequence.
    fn lock_balance(&self) -> Result<MutexGuard<'_, ()>> {
        self.balance_lock
            .lock()
            .map_err(|_| StoreError::Database("balance lock poisoned".to_string()))
    }

    /// Load a user or fail with `NotFound`.
    fn require_user(&self, user_id: &UserId) -> Result<User> {
        self.get_user(user_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })
    }

    /// Collect per-user index keys, newest first, applying offset and limit.
    ///
    /// Index keys are `user_id || ulid`, so a forward scan over the prefix is
    /// oldest-first; reversing gives newest-first.
    fn collect_user_index_keys(
        &self,
        cf_name: &str,
        prefix: &[u8],
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(prefix, rocksdb::Direction::Forward),
        );

        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        all_keys.reverse();

        Ok(all_keys.into_iter().skip(offset).take(limit).collect())
    }

    /// Shared body of the two purchase debits: check funds, then atomically
    /// write the subject record + its user index, the debited user, and the
    /// deduction transaction + its index.
    #[allow(clippy::too_many_arguments)]
    fn debit_with_subject(
        &self,
        user_id: &UserId,
        price_cents: i64,
        subject_cf: &str,
        subject_key: &[u8],
        subject_value: &[u8],
        index_cf: &str,
        index_key: &[u8],
        transaction: &Transaction,
    ) -> Result<i64> {
        let _guard = self.lock_balance()?;

        let mut user = self.require_user(user_id)?;
        if user.balance_cents < price_cents {
            return Err(StoreError::InsufficientCredits {
                balance_cents: user.balance_cents,
                required_cents: price_cents,
            });
        }

        user.balance_cents -= price_cents;
        user.updated_at = chrono::Utc::now();

        let cf_users = self.cf(cf::USERS)?;
        let cf_subject = self.cf(subject_cf)?;
        let cf_index = self.cf(index_cf)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let user_key = keys::user_key(user_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(user_id, &transaction.id);

        let user_value = Self::serialize(&user)?;
        let tx_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_subject, subject_key, subject_value);
        batch.put_cf(&cf_index, index_key, []);
        batch.put_cf(&cf_users, &user_key, &user_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);

        self.commit(batch)?;

        Ok(user.balance_cents)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        self.write(cf::USERS, &keys::user_key(&user.user_id), user)
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.read(cf::USERS, &keys::user_key(user_id))
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn put_transaction(&self, transaction: &Transaction) -> Result<()> {
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&transaction.user_id, &transaction.id);
        let value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_tx, &tx_key, &value);
        batch.put_cf(&cf_by_user, &user_tx_key, []); // Index entry (empty value)

        self.commit(batch)
    }

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<Transaction>> {
        self.read(cf::TRANSACTIONS, &keys::transaction_key(transaction_id))
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        let prefix = keys::user_transactions_prefix(user_id);
        let index_keys =
            self.collect_user_index_keys(cf::TRANSACTIONS_BY_USER, &prefix, limit, offset)?;

        let mut transactions = Vec::with_capacity(index_keys.len());
        for key in index_keys {
            let tx_id = keys::extract_transaction_id_from_user_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    fn has_payment(&self, payment_intent_id: &str) -> Result<bool> {
        Ok(self.get_payment(payment_intent_id)?.is_some())
    }

    fn get_payment(&self, payment_intent_id: &str) -> Result<Option<PaymentRecord>> {
        self.read(cf::PAYMENTS, &keys::payment_key(payment_intent_id))
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    fn create_service(&self, service: &Service) -> Result<()> {
        let cf_services = self.cf(cf::SERVICES)?;
        let cf_slugs = self.cf(cf::SERVICES_BY_SLUG)?;

        let slug_key = keys::service_slug_key(&service.slug);
        let existing = self
            .db
            .get_cf(&cf_slugs, &slug_key)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(StoreError::AlreadyExists {
                entity: "service",
                id: service.slug.clone(),
            });
        }

        let service_key = keys::service_key(&service.id);
        let value = Self::serialize(service)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_services, &service_key, &value);
        batch.put_cf(&cf_slugs, &slug_key, service.id.as_bytes());

        self.commit(batch)
    }

    fn get_service(&self, service_id: &ServiceId) -> Result<Option<Service>> {
        self.read(cf::SERVICES, &keys::service_key(service_id))
    }

    fn list_active_services(&self) -> Result<Vec<Service>> {
        let cf = self.cf(cf::SERVICES)?;

        let mut services: Vec<Service> = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let service: Service = Self::deserialize(&value)?;
            if service.is_active {
                services.push(service);
            }
        }

        services.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(services)
    }

    // =========================================================================
    // Verification Operations
    // =========================================================================

    fn get_verification(
        &self,
        verification_id: &VerificationId,
    ) -> Result<Option<Verification>> {
        self.read(cf::VERIFICATIONS, &keys::verification_key(verification_id))
    }

    fn list_verifications_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Verification>> {
        let prefix = keys::user_verifications_prefix(user_id);
        let index_keys =
            self.collect_user_index_keys(cf::VERIFICATIONS_BY_USER, &prefix, limit, offset)?;

        let mut verifications = Vec::with_capacity(index_keys.len());
        for key in index_keys {
            let verification_id = keys::extract_verification_id_from_user_key(&key);
            if let Some(verification) = self.get_verification(&verification_id)? {
                verifications.push(verification);
            }
        }

        Ok(verifications)
    }

    fn put_verification(&self, verification: &Verification) -> Result<()> {
        if self.get_verification(&verification.id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "verification",
                id: verification.id.to_string(),
            });
        }

        self.write(
            cf::VERIFICATIONS,
            &keys::verification_key(&verification.id),
            verification,
        )
    }

    // =========================================================================
    // Rental Operations
    // =========================================================================

    fn get_rental(&self, rental_id: &RentalId) -> Result<Option<Rental>> {
        self.read(cf::RENTALS, &keys::rental_key(rental_id))
    }

    fn list_rentals_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Rental>> {
        let prefix = keys::user_rentals_prefix(user_id);
        let index_keys =
            self.collect_user_index_keys(cf::RENTALS_BY_USER, &prefix, limit, offset)?;

        let mut rentals = Vec::with_capacity(index_keys.len());
        for key in index_keys {
            let rental_id = keys::extract_rental_id_from_user_key(&key);
            if let Some(rental) = self.get_rental(&rental_id)? {
                rentals.push(rental);
            }
        }

        Ok(rentals)
    }

    // =========================================================================
    // Pricing Operations
    // =========================================================================

    fn get_pricing_setting(&self, service_type: ServiceType) -> Result<Option<PricingSetting>> {
        self.read(cf::PRICING, &keys::pricing_key(service_type))
    }

    fn put_pricing_setting(&self, setting: &PricingSetting) -> Result<()> {
        self.write(cf::PRICING, &keys::pricing_key(setting.service_type), setting)
    }

    fn list_pricing_settings(&self) -> Result<Vec<PricingSetting>> {
        let cf = self.cf(cf::PRICING)?;

        let mut settings: Vec<PricingSetting> = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            settings.push(Self::deserialize(&value)?);
        }

        settings.sort_by_key(|s| s.service_type.as_str());

        Ok(settings)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn debit_for_verification(
        &self,
        verification: &Verification,
        transaction: &Transaction,
    ) -> Result<i64> {
        let subject_key = keys::verification_key(&verification.id);
        let index_key = keys::user_verification_key(&verification.user_id, &verification.id);
        let subject_value = Self::serialize(verification)?;

        self.debit_with_subject(
            &verification.user_id,
            verification.price_cents,
            cf::VERIFICATIONS,
            &subject_key,
            &subject_value,
            cf::VERIFICATIONS_BY_USER,
            &index_key,
            transaction,
        )
    }

    fn debit_for_rental(&self, rental: &Rental, transaction: &Transaction) -> Result<i64> {
        let subject_key = keys::rental_key(&rental.id);
        let index_key = keys::user_rental_key(&rental.user_id, &rental.id);
        let subject_value = Self::serialize(rental)?;

        self.debit_with_subject(
            &rental.user_id,
            rental.price_cents,
            cf::RENTALS,
            &subject_key,
            &subject_value,
            cf::RENTALS_BY_USER,
            &index_key,
            transaction,
        )
    }

    fn credit_purchase(&self, payment: &PaymentRecord, transaction: &Transaction) -> Result<i64> {
        let _guard = self.lock_balance()?;

        if self.has_payment(&payment.payment_intent_id)? {
            return Err(StoreError::DuplicatePayment {
                payment_intent_id: payment.payment_intent_id.clone(),
            });
        }

        let mut user = self.require_user(&payment.user_id)?;
        user.balance_cents += payment.amount_cents;
        user.updated_at = chrono::Utc::now();

        let cf_users = self.cf(cf::USERS)?;
        let cf_payments = self.cf(cf::PAYMENTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let user_key = keys::user_key(&payment.user_id);
        let payment_key = keys::payment_key(&payment.payment_intent_id);
        let tx_key = keys::transaction_key(&transaction.id);
        let user_tx_key = keys::user_transaction_key(&payment.user_id, &transaction.id);

        let user_value = Self::serialize(&user)?;
        let payment_value = Self::serialize(payment)?;
        let tx_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_payments, &payment_key, &payment_value);
        batch.put_cf(&cf_users, &user_key, &user_value);
        batch.put_cf(&cf_tx, &tx_key, &tx_value);
        batch.put_cf(&cf_tx_by_user, &user_tx_key, []);

        self.commit(batch)?;

        Ok(user.balance_cents)
    }
}

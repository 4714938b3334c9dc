//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. Record keys are the raw 16-byte id encodings; per-user
//! index keys are `user_id (16 bytes) || record_id (16 bytes)`, so ULID time
//! ordering makes an index scan a chronological scan.

use numbox_core::{RentalId, ServiceId, ServiceType, TransactionId, UserId, VerificationId};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    compound_key(user_id, transaction_id.to_bytes())
}

/// Create a prefix for iterating all transactions for a user.
#[must_use]
pub fn user_transactions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the transaction ID from a user-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id_from_user_key(key: &[u8]) -> TransactionId {
    TransactionId::from_bytes(suffix_bytes(key))
}

/// Create a verification key from a verification ID.
#[must_use]
pub fn verification_key(verification_id: &VerificationId) -> Vec<u8> {
    verification_id.to_bytes().to_vec()
}

/// Create a user-verification index key.
#[must_use]
pub fn user_verification_key(user_id: &UserId, verification_id: &VerificationId) -> Vec<u8> {
    compound_key(user_id, verification_id.to_bytes())
}

/// Create a prefix for iterating all verifications for a user.
#[must_use]
pub fn user_verifications_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the verification ID from a user-verification index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_verification_id_from_user_key(key: &[u8]) -> VerificationId {
    VerificationId::from_bytes(suffix_bytes(key))
}

/// Create a rental key from a rental ID.
#[must_use]
pub fn rental_key(rental_id: &RentalId) -> Vec<u8> {
    rental_id.to_bytes().to_vec()
}

/// Create a user-rental index key.
#[must_use]
pub fn user_rental_key(user_id: &UserId, rental_id: &RentalId) -> Vec<u8> {
    compound_key(user_id, rental_id.to_bytes())
}

/// Create a prefix for iterating all rentals for a user.
#[must_use]
pub fn user_rentals_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the rental ID from a user-rental index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_rental_id_from_user_key(key: &[u8]) -> RentalId {
    RentalId::from_bytes(suffix_bytes(key))
}

/// Create a service key from a service ID.
#[must_use]
pub fn service_key(service_id: &ServiceId) -> Vec<u8> {
    service_id.as_bytes().to_vec()
}

/// Create a slug index key from a service slug.
#[must_use]
pub fn service_slug_key(slug: &str) -> Vec<u8> {
    slug.as_bytes().to_vec()
}

/// Create a pricing key from a service type.
#[must_use]
pub fn pricing_key(service_type: ServiceType) -> Vec<u8> {
    service_type.as_str().as_bytes().to_vec()
}

/// Create a payment key from a payment intent ID.
#[must_use]
pub fn payment_key(payment_intent_id: &str) -> Vec<u8> {
    payment_intent_id.as_bytes().to_vec()
}

/// Format: `user_id (16 bytes) || record_id (16 bytes)`.
fn compound_key(user_id: &UserId, record_bytes: [u8; 16]) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&record_bytes);
    key
}

/// The trailing 16 bytes of a 32-byte index key.
fn suffix_bytes(key: &[u8]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_length() {
        let user_id = UserId::generate();
        let key = user_key(&user_id);
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn transaction_key_length() {
        let tx_id = TransactionId::generate();
        let key = transaction_key(&tx_id);
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn user_transaction_key_format() {
        let user_id = UserId::generate();
        let tx_id = TransactionId::generate();
        let key = user_transaction_key(&user_id, &tx_id);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], tx_id.to_bytes());
    }

    #[test]
    fn extract_transaction_id_roundtrip() {
        let user_id = UserId::generate();
        let tx_id = TransactionId::generate();
        let key = user_transaction_key(&user_id, &tx_id);

        let extracted = extract_transaction_id_from_user_key(&key);
        assert_eq!(extracted, tx_id);
    }

    #[test]
    fn extract_verification_id_roundtrip() {
        let user_id = UserId::generate();
        let verification_id = VerificationId::generate();
        let key = user_verification_key(&user_id, &verification_id);

        let extracted = extract_verification_id_from_user_key(&key);
        assert_eq!(extracted, verification_id);
    }

    #[test]
    fn extract_rental_id_roundtrip() {
        let user_id = UserId::generate();
        let rental_id = RentalId::generate();
        let key = user_rental_key(&user_id, &rental_id);

        let extracted = extract_rental_id_from_user_key(&key);
        assert_eq!(extracted, rental_id);
    }

    #[test]
    fn pricing_key_uses_type_string() {
        assert_eq!(
            pricing_key(ServiceType::NonRenewableRental),
            b"non_renewable_rental".to_vec()
        );
    }
}

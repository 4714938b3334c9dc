//! Ledger transaction types for numbox.
//!
//! This module defines the immutable transactions that record all balance
//! changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TransactionId, UserId};

/// A ledger transaction recording a single balance change.
///
/// Every change to a user's balance appends exactly one transaction.
/// Transactions use ULIDs for time-ordered IDs and are never modified after
/// creation. The amount is always positive: direction comes from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Direction of the balance change.
    pub kind: TransactionKind,

    /// Amount in cents, always positive.
    pub amount_cents: i64,

    /// Human-readable description, e.g. `"Phone verification - Google"`.
    pub description: String,

    /// Outcome recorded at creation time.
    pub status: TransactionStatus,

    /// Payment intent that funded this transaction, for purchases.
    pub payment_intent_id: Option<String>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new purchase transaction (credits added).
    #[must_use]
    pub fn purchase(
        user_id: UserId,
        amount_cents: i64,
        description: String,
        payment_intent_id: Option<String>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Purchase,
            amount_cents: amount_cents.abs(),
            description,
            status: TransactionStatus::Completed,
            payment_intent_id,
            created_at: Utc::now(),
        }
    }

    /// Create a new deduction transaction (credits spent).
    #[must_use]
    pub fn deduction(user_id: UserId, amount_cents: i64, description: String) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Deduction,
            amount_cents: amount_cents.abs(),
            description,
            status: TransactionStatus::Completed,
            payment_intent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Signed balance delta this transaction represents, in cents.
    #[must_use]
    pub const fn signed_amount_cents(&self) -> i64 {
        match self.kind {
            TransactionKind::Purchase => self.amount_cents,
            TransactionKind::Deduction => -self.amount_cents,
        }
    }
}

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// User purchased credits.
    Purchase,

    /// Credits deducted for a verification or rental.
    Deduction,
}

impl TransactionKind {
    /// Check if this kind adds credits (positive balance change).
    #[must_use]
    pub const fn is_credit(&self) -> bool {
        matches!(self, Self::Purchase)
    }

    /// Check if this kind removes credits (negative balance change).
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        matches!(self, Self::Deduction)
    }
}

/// Outcome of a transaction, recorded at creation.
///
/// Nothing transitions a stored transaction between statuses; the value a
/// transaction is written with is the value it keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting settlement.
    Pending,

    /// Settled.
    Completed,

    /// Did not settle.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_transaction() {
        let user_id = UserId::generate();
        let tx = Transaction::purchase(
            user_id,
            1000,
            "Credit purchase".into(),
            Some("pi_123".into()),
        );

        assert_eq!(tx.amount_cents, 1000);
        assert_eq!(tx.kind, TransactionKind::Purchase);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.signed_amount_cents(), 1000);
        assert_eq!(tx.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[test]
    fn deduction_amount_stays_positive() {
        let user_id = UserId::generate();
        let tx = Transaction::deduction(user_id, -25, "Phone verification - Google".into());

        assert_eq!(tx.amount_cents, 25); // Normalized
        assert_eq!(tx.kind, TransactionKind::Deduction);
        assert_eq!(tx.signed_amount_cents(), -25);
        assert!(tx.payment_intent_id.is_none());
    }

    #[test]
    fn kind_is_credit_debit() {
        assert!(TransactionKind::Purchase.is_credit());
        assert!(!TransactionKind::Purchase.is_debit());

        assert!(TransactionKind::Deduction.is_debit());
        assert!(!TransactionKind::Deduction.is_credit());
    }

    #[test]
    fn kind_serde_snake_case() {
        let json = serde_json::to_string(&TransactionKind::Deduction).unwrap();
        assert_eq!(json, "\"deduction\"");
        let json = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}

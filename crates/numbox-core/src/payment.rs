//! Payment application records for numbox.
//!
//! This module defines the idempotency marker written when a payment intent is
//! credited to a balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A processed payment, keyed by the provider's payment intent ID.
///
/// The store writes one record per credited intent in the same atomic batch
/// as the balance change, so replaying a confirmation can never credit twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// The payment intent ID from the payment provider.
    pub payment_intent_id: String,

    /// The user who was credited.
    pub user_id: UserId,

    /// Amount credited in cents.
    pub amount_cents: i64,

    /// When the credit was applied.
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Create a new payment record.
    #[must_use]
    pub fn new(payment_intent_id: String, user_id: UserId, amount_cents: i64) -> Self {
        Self {
            payment_intent_id,
            user_id,
            amount_cents,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_record_new() {
        let user_id = UserId::generate();
        let record = PaymentRecord::new("pi_abc".into(), user_id, 2500);

        assert_eq!(record.payment_intent_id, "pi_abc");
        assert_eq!(record.amount_cents, 2500);
        assert_eq!(record.user_id, user_id);
    }
}

//! User account types for numbox.
//!
//! This module defines the user record including the credit balance and the
//! profile fields mirrored from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user account.
///
/// Users are created on first authenticated contact and never deleted. The
/// record tracks the credit balance alongside profile fields synced from the
/// identity provider's JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID (from the identity provider's `sub` claim).
    pub user_id: UserId,

    /// Email address, if the identity provider shared one.
    pub email: Option<String>,

    /// Given name.
    pub first_name: Option<String>,

    /// Family name.
    pub last_name: Option<String>,

    /// Avatar URL.
    pub profile_image_url: Option<String>,

    /// Current credit balance in cents.
    /// 1 credit = $0.01 = 1 cent.
    pub balance_cents: i64,

    /// When the user record was created.
    pub created_at: DateTime<Utc>,

    /// When the user record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with zero balance.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            balance_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user has sufficient credits for a deduction.
    #[must_use]
    pub fn has_sufficient_credits(&self, amount_cents: i64) -> bool {
        self.balance_cents >= amount_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_zero_balance() {
        let user_id = UserId::generate();
        let user = User::new(user_id);
        assert_eq!(user.balance_cents, 0);
        assert!(user.email.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn user_sufficient_credits() {
        let user_id = UserId::generate();
        let mut user = User::new(user_id);
        user.balance_cents = 100;

        assert!(user.has_sufficient_credits(25));
        assert!(user.has_sufficient_credits(100));
        assert!(!user.has_sufficient_credits(101));
    }
}

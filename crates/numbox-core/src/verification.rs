//! Verification types for numbox.
//!
//! A verification is a short-lived phone number bought to receive a single
//! SMS code from one catalog service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{ServiceId, UserId, VerificationId};

/// How long an assigned number listens for a code, in seconds (5 minutes).
pub const VERIFICATION_WINDOW_SECS: i64 = 300;

/// A purchased SMS verification.
///
/// The price is a snapshot of the service's price at purchase time; later
/// catalog or pricing changes never touch existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    /// Unique verification ID (ULID for time-ordering).
    pub id: VerificationId,

    /// The user who bought the verification.
    pub user_id: UserId,

    /// The catalog service the code is expected from.
    pub service_id: ServiceId,

    /// The assigned phone number, once the provider allocated one.
    pub phone_number: Option<String>,

    /// Current lifecycle state.
    pub status: VerificationStatus,

    /// The received SMS code, once one arrived.
    pub code: Option<String>,

    /// Price paid, in cents (snapshot at purchase time).
    pub price_cents: i64,

    /// When the verification was purchased.
    pub created_at: DateTime<Utc>,

    /// When the listening window closes.
    pub expires_at: DateTime<Utc>,
}

impl Verification {
    /// Create a new verification with an assigned number.
    ///
    /// The record starts `Active` with a 5-minute listening window.
    #[must_use]
    pub fn new(
        user_id: UserId,
        service_id: ServiceId,
        price_cents: i64,
        phone_number: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VerificationId::generate(),
            user_id,
            service_id,
            phone_number: Some(phone_number),
            status: VerificationStatus::Active,
            code: None,
            price_cents,
            created_at: now,
            expires_at: now + Duration::seconds(VERIFICATION_WINDOW_SECS),
        }
    }

    /// Record a received SMS code, completing the verification.
    ///
    /// Only `Pending` and `Active` verifications accept a code; in any other
    /// state this returns `false` without modifying the record.
    pub fn record_code(&mut self, code: String) -> bool {
        match self.status {
            VerificationStatus::Pending | VerificationStatus::Active => {
                self.code = Some(code);
                self.status = VerificationStatus::Completed;
                true
            }
            VerificationStatus::Completed
            | VerificationStatus::Expired
            | VerificationStatus::Failed => false,
        }
    }

    /// Check whether the listening window has closed.
    ///
    /// Expiry is derived from `expires_at`; nothing rewrites stored records
    /// when the window passes.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Lifecycle state of a verification.
///
/// `pending → active → {completed, expired, failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Bought, number not yet assigned.
    Pending,

    /// Number assigned, listening for a code.
    Active,

    /// A code arrived.
    Completed,

    /// The window closed without a code.
    Expired,

    /// The provider failed the assignment.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_verification_is_active_with_window() {
        let v = Verification::new(
            UserId::generate(),
            ServiceId::generate(),
            25,
            "+1 (555) 123-4567".into(),
        );

        assert_eq!(v.status, VerificationStatus::Active);
        assert_eq!(v.phone_number.as_deref(), Some("+1 (555) 123-4567"));
        assert!(v.code.is_none());
        assert_eq!(
            (v.expires_at - v.created_at).num_seconds(),
            VERIFICATION_WINDOW_SECS
        );
    }

    #[test]
    fn record_code_completes_active() {
        let mut v = Verification::new(
            UserId::generate(),
            ServiceId::generate(),
            25,
            "+1 (555) 123-4567".into(),
        );

        assert!(v.record_code("482913".into()));
        assert_eq!(v.status, VerificationStatus::Completed);
        assert_eq!(v.code.as_deref(), Some("482913"));
    }

    #[test]
    fn record_code_rejected_after_completion() {
        let mut v = Verification::new(
            UserId::generate(),
            ServiceId::generate(),
            25,
            "+1 (555) 123-4567".into(),
        );
        v.record_code("111111".into());

        assert!(!v.record_code("222222".into()));
        assert_eq!(v.code.as_deref(), Some("111111"));
    }

    #[test]
    fn expiry_is_derived_from_timestamp() {
        let v = Verification::new(
            UserId::generate(),
            ServiceId::generate(),
            25,
            "+1 (555) 123-4567".into(),
        );

        assert!(!v.is_expired(v.created_at));
        assert!(v.is_expired(v.expires_at));
        assert!(v.is_expired(v.expires_at + Duration::seconds(1)));
    }
}

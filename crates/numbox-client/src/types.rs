//! Request and response types for the numbox client.

use chrono::{DateTime, Utc};
use numbox_core::{RentalKind, ServiceType};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status (`"ok"` when healthy).
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// The authenticated user's profile and balance.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Email address, if known.
    pub email: Option<String>,
    /// First name, if known.
    pub first_name: Option<String>,
    /// Last name, if known.
    pub last_name: Option<String>,
    /// Profile image URL, if set.
    pub profile_image_url: Option<String>,
    /// Credit balance in cents.
    pub balance_cents: i64,
    /// Balance formatted as dollars.
    pub balance_formatted: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A catalog service that verifications can be purchased for.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResponse {
    /// Service ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-safe slug.
    pub slug: String,
    /// Logo URL, if any.
    pub logo_url: Option<String>,
    /// Category label, if any.
    pub category: Option<String>,
    /// Price per verification in cents.
    pub base_price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Whether the service is purchasable.
    pub is_active: bool,
}

/// Create verification request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVerificationRequest {
    /// The catalog service to receive a code from.
    pub service_id: String,
}

/// A purchased verification.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationResponse {
    /// Verification ID.
    pub id: String,
    /// The catalog service ID.
    pub service_id: String,
    /// The assigned phone number.
    pub phone_number: Option<String>,
    /// Lifecycle state.
    pub status: String,
    /// The received SMS code, once one arrived.
    pub code: Option<String>,
    /// Price paid in cents.
    pub price_cents: i64,
    /// When the verification was purchased.
    pub created_at: DateTime<Utc>,
    /// When the listening window closes.
    pub expires_at: DateTime<Utc>,
}

/// Create rental request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRentalRequest {
    /// Renewable or one-shot.
    #[serde(rename = "type")]
    pub kind: RentalKind,
    /// Rental length in days.
    pub duration_days: u32,
}

/// A rented phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct RentalResponse {
    /// Rental ID.
    pub id: String,
    /// The rented phone number.
    pub phone_number: String,
    /// Renewable or one-shot.
    #[serde(rename = "type")]
    pub kind: RentalKind,
    /// Rental length in days.
    pub duration_days: u32,
    /// When the rental started.
    pub start_date: DateTime<Utc>,
    /// When the rental expires.
    pub expires_at: DateTime<Utc>,
    /// Whether the rental renews automatically.
    pub auto_renew: bool,
    /// Price paid in cents.
    pub price_cents: i64,
    /// Lifecycle state.
    pub status: String,
}

/// Create payment intent request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentIntentRequest {
    /// Credit package in whole dollars.
    pub package_amount: i64,
}

/// Create payment intent response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentIntentResponse {
    /// Client secret for confirming the payment from the browser.
    pub client_secret: String,
    /// The payment intent ID, passed back to [`purchase_credits`].
    ///
    /// [`purchase_credits`]: crate::NumboxClient::purchase_credits
    pub payment_intent_id: String,
}

/// Purchase credits request.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseCreditsRequest {
    /// The payment intent that was confirmed on the client.
    pub payment_intent_id: String,
}

/// Purchase credits response.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCreditsResponse {
    /// Amount credited in cents.
    pub amount_cents: i64,
    /// New balance in cents.
    pub balance_cents: i64,
    /// The recorded purchase transaction.
    pub transaction: TransactionResponse,
}

/// A ledger transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Direction of the balance change (`"purchase"` or `"deduction"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount in cents, always positive.
    pub amount_cents: i64,
    /// Amount formatted as dollars.
    pub amount_formatted: String,
    /// Description.
    pub description: String,
    /// Outcome recorded at creation time.
    pub status: String,
    /// Payment intent that funded this transaction, for purchases.
    pub payment_intent_id: Option<String>,
    /// Timestamp.
    pub created_at: DateTime<Utc>,
}

/// One page of transaction history.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// Update pricing request.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePricingRequest {
    /// New base price in dollars.
    pub base_price: f64,
}

/// An admin-editable base price for one product category.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettingResponse {
    /// Which product category this row prices.
    pub service_type: ServiceType,
    /// Base price in cents.
    pub base_price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Description shown in the storefront.
    pub description: Option<String>,
    /// When the price was last changed.
    pub updated_at: DateTime<Utc>,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Additional details.
    pub details: Option<serde_json::Value>,
}

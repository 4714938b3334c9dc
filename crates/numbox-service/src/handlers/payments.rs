//! Credit purchase and transaction history handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use numbox_core::{format_usd, PaymentRecord, Transaction, CREDIT_PACKAGES};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create payment intent request.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Credit package in whole dollars. Must be one of the fixed packages.
    pub package_amount: i64,
}

/// Create payment intent response.
#[derive(Debug, Serialize)]
pub struct CreatePaymentIntentResponse {
    /// Client secret for confirming the payment from the browser.
    pub client_secret: String,
    /// The payment intent ID, passed back to `/api/credits/purchase`.
    pub payment_intent_id: String,
}

/// Create a Stripe payment intent for a credit package.
///
/// Only the fixed packages are accepted; arbitrary amounts are rejected
/// before Stripe is contacted.
pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>, ApiError> {
    if !CREDIT_PACKAGES.contains(&body.package_amount) {
        return Err(ApiError::BadRequest(
            "Invalid package amount. Must be one of: $5, $10, $25, $50, $100".into(),
        ));
    }

    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Stripe not configured".into()))?;

    let amount_cents = body.package_amount * 100;

    let intent = stripe
        .create_payment_intent(amount_cents, &auth.user_id.to_string(), body.package_amount)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create Stripe payment intent");
            ApiError::ExternalService(format!("Failed to create payment intent: {e}"))
        })?;

    let client_secret = intent
        .client_secret
        .ok_or_else(|| ApiError::ExternalService("Stripe returned no client secret".into()))?;

    tracing::info!(
        user_id = %auth.user_id,
        payment_intent_id = %intent.id,
        amount_cents = %amount_cents,
        "Payment intent created"
    );

    Ok(Json(CreatePaymentIntentResponse {
        client_secret,
        payment_intent_id: intent.id,
    }))
}

/// Purchase credits request.
#[derive(Debug, Deserialize)]
pub struct PurchaseCreditsRequest {
    /// The payment intent that was confirmed on the client.
    pub payment_intent_id: String,
}

/// Purchase credits response.
#[derive(Debug, Serialize)]
pub struct PurchaseCreditsResponse {
    /// Amount credited in cents.
    pub amount_cents: i64,
    /// New balance in cents.
    pub balance_cents: i64,
    /// The recorded purchase transaction.
    pub transaction: TransactionResponse,
}

/// Credit a completed payment to the caller's balance.
///
/// The intent is re-fetched from Stripe and the credited amount is taken
/// from there; client-supplied amounts are never trusted. Replaying a
/// payment intent ID is a conflict and credits nothing.
pub async fn purchase_credits(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PurchaseCreditsRequest>,
) -> Result<Json<PurchaseCreditsResponse>, ApiError> {
    if body.payment_intent_id.is_empty() {
        return Err(ApiError::BadRequest("Payment intent ID is required".into()));
    }

    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Stripe not configured".into()))?;

    let intent = stripe
        .get_payment_intent(&body.payment_intent_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to retrieve Stripe payment intent");
            ApiError::ExternalService(format!("Failed to verify payment: {e}"))
        })?;

    if intent.status != "succeeded" {
        return Err(ApiError::BadRequest("Payment has not succeeded".into()));
    }

    let payment = PaymentRecord::new(intent.id.clone(), auth.user_id, intent.amount);
    let transaction = Transaction::purchase(
        auth.user_id,
        intent.amount,
        "Credit purchase".into(),
        Some(intent.id.clone()),
    );

    let balance_cents = state.store.credit_purchase(&payment, &transaction)?;

    tracing::info!(
        user_id = %auth.user_id,
        payment_intent_id = %intent.id,
        amount_cents = %intent.amount,
        balance_cents = %balance_cents,
        "Credits purchased"
    );

    Ok(Json(PurchaseCreditsResponse {
        amount_cents: intent.amount,
        balance_cents,
        transaction: TransactionResponse::from(&transaction),
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Direction of the balance change.
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
    /// Timestamp (ISO 8601).
    pub created_at: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: format!("{:?}", tx.kind).to_lowercase(),
            amount_cents: tx.amount_cents,
            amount_formatted: format_usd(tx.amount_cents),
            description: tx.description.clone(),
            status: format!("{:?}", tx.status).to_lowercase(),
            payment_intent_id: tx.payment_intent_id.clone(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List the caller's transaction history, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions = state
        .store
        .list_transactions_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

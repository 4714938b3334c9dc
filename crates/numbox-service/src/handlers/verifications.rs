//! Verification lifecycle handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use numbox_core::{ServiceId, Transaction, Verification, VerificationId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::provider::NumberSpec;
use crate::state::AppState;

/// Create verification request.
#[derive(Debug, Deserialize)]
pub struct CreateVerificationRequest {
    /// The catalog service to receive a code from.
    pub service_id: ServiceId,
}

/// Verification response.
#[derive(Debug, Serialize)]
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
    /// When the verification was purchased (ISO 8601).
    pub created_at: String,
    /// When the listening window closes (ISO 8601).
    pub expires_at: String,
}

impl From<&Verification> for VerificationResponse {
    fn from(v: &Verification) -> Self {
        Self {
            id: v.id.to_string(),
            service_id: v.service_id.to_string(),
            phone_number: v.phone_number.clone(),
            status: format!("{:?}", v.status).to_lowercase(),
            code: v.code.clone(),
            price_cents: v.price_cents,
            created_at: v.created_at.to_rfc3339(),
            expires_at: v.expires_at.to_rfc3339(),
        }
    }
}

/// Purchase a verification.
///
/// Pricing is server-side: the debit is the service's current base price,
/// never an amount from the request. The number is leased from the provider
/// before anything is written, so a provider failure leaves no partial state.
pub async fn create_verification(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateVerificationRequest>,
) -> Result<Json<VerificationResponse>, ApiError> {
    let service = state
        .store
        .get_service(&body.service_id)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;

    state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let spec = NumberSpec::Verification {
        service_slug: service.slug.clone(),
    };
    let phone_number = state.provider.assign_number(&spec).await?;

    let verification = Verification::new(
        auth.user_id,
        service.id,
        service.base_price_cents,
        phone_number,
    );
    let transaction = Transaction::deduction(
        auth.user_id,
        service.base_price_cents,
        format!("Phone verification - {}", service.name),
    );

    let new_balance = state
        .store
        .debit_for_verification(&verification, &transaction)?;

    tracing::info!(
        user_id = %auth.user_id,
        verification_id = %verification.id,
        service = %service.slug,
        price_cents = %service.base_price_cents,
        new_balance_cents = %new_balance,
        "Verification purchased"
    );

    Ok(Json(VerificationResponse::from(&verification)))
}

/// List the caller's verifications, newest first.
pub async fn list_verifications(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<VerificationResponse>>, ApiError> {
    let verifications = state
        .store
        .list_verifications_by_user(&auth.user_id, 100, 0)?;

    Ok(Json(
        verifications.iter().map(VerificationResponse::from).collect(),
    ))
}

/// Get one verification, scoped to the caller.
///
/// A verification owned by another user is indistinguishable from a missing
/// one.
pub async fn get_verification(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(verification_id): Path<VerificationId>,
) -> Result<Json<VerificationResponse>, ApiError> {
    let verification = state
        .store
        .get_verification(&verification_id)?
        .filter(|v| v.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Verification not found".into()))?;

    Ok(Json(VerificationResponse::from(&verification)))
}

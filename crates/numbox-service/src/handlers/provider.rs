//! Inbound SMS handlers for the number provider.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use numbox_core::VerificationId;

use crate::auth::ProviderAuth;
use crate::error::ApiError;
use crate::handlers::verifications::VerificationResponse;
use crate::state::AppState;

/// Inbound SMS notification from the provider.
#[derive(Debug, Deserialize)]
pub struct InboundSmsRequest {
    /// The verification the code belongs to.
    pub verification_id: VerificationId,
    /// The received SMS code.
    pub code: String,
}

/// Record an SMS code delivered by the provider.
///
/// Completes the verification. Codes for verifications that already
/// completed, expired, or failed are rejected so a late delivery cannot
/// overwrite an earlier code.
pub async fn inbound_sms(
    State(state): State<Arc<AppState>>,
    auth: ProviderAuth,
    Json(body): Json<InboundSmsRequest>,
) -> Result<Json<VerificationResponse>, ApiError> {
    tracing::debug!(
        provider = %auth.provider_name,
        verification_id = %body.verification_id,
        "Processing inbound SMS"
    );

    let mut verification = state
        .store
        .get_verification(&body.verification_id)?
        .ok_or_else(|| ApiError::NotFound("Verification not found".into()))?;

    if !verification.record_code(body.code) {
        return Err(ApiError::Conflict(
            "Verification is not accepting codes".into(),
        ));
    }

    state.store.put_verification(&verification)?;

    tracing::info!(
        provider = %auth.provider_name,
        verification_id = %verification.id,
        "Verification completed"
    );

    Ok(Json(VerificationResponse::from(&verification)))
}

//! Rental lifecycle handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use numbox_core::{Rental, RentalId, RentalKind, Transaction, MAX_RENTAL_DAYS, MIN_RENTAL_DAYS};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::provider::NumberSpec;
use crate::state::AppState;

/// Create rental request.
#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    /// Renewable or one-shot.
    #[serde(rename = "type")]
    pub kind: RentalKind,
    /// Rental length in days.
    pub duration_days: u32,
}

/// Rental response.
#[derive(Debug, Serialize)]
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
    /// When the rental began (ISO 8601).
    pub start_date: String,
    /// When the rental lapses (ISO 8601).
    pub expires_at: String,
    /// Whether the rental renews itself.
    pub auto_renew: bool,
    /// Price paid in cents.
    pub price_cents: i64,
    /// Lifecycle state.
    pub status: String,
}

impl From<&Rental> for RentalResponse {
    fn from(rental: &Rental) -> Self {
        Self {
            id: rental.id.to_string(),
            phone_number: rental.phone_number.clone(),
            kind: rental.kind,
            duration_days: rental.duration_days,
            start_date: rental.start_date.to_rfc3339(),
            expires_at: rental.expires_at.to_rfc3339(),
            auto_renew: rental.auto_renew,
            price_cents: rental.price_cents,
            status: format!("{:?}", rental.status).to_lowercase(),
        }
    }
}

/// Rent a phone number.
///
/// Pricing comes from the admin-editable pricing settings, never from the
/// request. The number is leased from the provider before anything is
/// written.
pub async fn create_rental(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateRentalRequest>,
) -> Result<Json<RentalResponse>, ApiError> {
    if !(MIN_RENTAL_DAYS..=MAX_RENTAL_DAYS).contains(&body.duration_days) {
        return Err(ApiError::BadRequest(format!(
            "Duration must be between {MIN_RENTAL_DAYS} and {MAX_RENTAL_DAYS} days"
        )));
    }

    let pricing = state
        .store
        .get_pricing_setting(body.kind.pricing_type())?
        .ok_or_else(|| ApiError::NotFound("Pricing not found".into()))?;

    state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let spec = NumberSpec::Rental {
        duration_days: body.duration_days,
    };
    let phone_number = state.provider.assign_number(&spec).await?;

    let rental = Rental::new(
        auth.user_id,
        body.kind,
        body.duration_days,
        pricing.base_price_cents,
        phone_number,
    );
    let transaction = Transaction::deduction(
        auth.user_id,
        pricing.base_price_cents,
        format!("{} rental ({} days)", body.kind.label(), body.duration_days),
    );

    let new_balance = state.store.debit_for_rental(&rental, &transaction)?;

    tracing::info!(
        user_id = %auth.user_id,
        rental_id = %rental.id,
        duration_days = %body.duration_days,
        price_cents = %pricing.base_price_cents,
        new_balance_cents = %new_balance,
        "Rental purchased"
    );

    Ok(Json(RentalResponse::from(&rental)))
}

/// List the caller's rentals, newest first.
pub async fn list_rentals(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<RentalResponse>>, ApiError> {
    let rentals = state.store.list_rentals_by_user(&auth.user_id, 100, 0)?;

    Ok(Json(rentals.iter().map(RentalResponse::from).collect()))
}

/// Get one rental, scoped to the caller.
pub async fn get_rental(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(rental_id): Path<RentalId>,
) -> Result<Json<RentalResponse>, ApiError> {
    let rental = state
        .store
        .get_rental(&rental_id)?
        .filter(|r| r.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Rental not found".into()))?;

    Ok(Json(RentalResponse::from(&rental)))
}

//! Pricing settings handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use numbox_core::{dollars_to_cents, format_usd, PricingSetting, ServiceType};

use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Pricing setting response.
#[derive(Debug, Serialize)]
pub struct PricingSettingResponse {
    /// Which product category this row prices.
    pub service_type: ServiceType,
    /// Base price in cents.
    pub base_price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Description shown in the storefront.
    pub description: Option<String>,
    /// When the price was last changed (ISO 8601).
    pub updated_at: String,
}

impl From<&PricingSetting> for PricingSettingResponse {
    fn from(setting: &PricingSetting) -> Self {
        Self {
            service_type: setting.service_type,
            base_price_cents: setting.base_price_cents,
            price_formatted: format_usd(setting.base_price_cents),
            description: setting.description.clone(),
            updated_at: setting.updated_at.to_rfc3339(),
        }
    }
}

/// List all pricing settings.
pub async fn list_pricing_settings(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<Vec<PricingSettingResponse>>, ApiError> {
    let settings = state.store.list_pricing_settings()?;
    Ok(Json(
        settings.iter().map(PricingSettingResponse::from).collect(),
    ))
}

/// Update pricing request.
#[derive(Debug, Deserialize)]
pub struct UpdatePricingRequest {
    /// New base price in dollars.
    pub base_price: f64,
}

/// Update a pricing setting.
///
/// Prices snapshot onto records at purchase time, so the change only
/// affects purchases made after this call.
pub async fn update_pricing_setting(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Path(service_type): Path<String>,
    Json(body): Json<UpdatePricingRequest>,
) -> Result<Json<PricingSettingResponse>, ApiError> {
    let service_type: ServiceType = service_type
        .parse()
        .map_err(|_| ApiError::NotFound("Pricing setting not found".into()))?;

    let base_price_cents = dollars_to_cents(body.base_price);
    if base_price_cents <= 0 {
        return Err(ApiError::BadRequest("Base price must be positive".into()));
    }

    let mut setting = state
        .store
        .get_pricing_setting(service_type)?
        .ok_or_else(|| ApiError::NotFound("Pricing setting not found".into()))?;

    setting.base_price_cents = base_price_cents;
    setting.updated_at = chrono::Utc::now();
    state.store.put_pricing_setting(&setting)?;

    tracing::info!(
        admin_id = %admin.admin_id,
        service_type = %service_type,
        base_price_cents = %base_price_cents,
        "Pricing setting updated"
    );

    Ok(Json(PricingSettingResponse::from(&setting)))
}

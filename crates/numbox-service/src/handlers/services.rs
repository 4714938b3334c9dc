//! Service catalog handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use numbox_core::{format_usd, Service, ServiceId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Service response.
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    /// Service ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Verification price in cents.
    pub base_price_cents: i64,
    /// Price formatted as dollars.
    pub price_formatted: String,
    /// Whether the service is listed in the catalog.
    pub is_active: bool,
}

impl From<&Service> for ServiceResponse {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.to_string(),
            name: service.name.clone(),
            slug: service.slug.clone(),
            logo_url: service.logo_url.clone(),
            category: service.category.clone(),
            base_price_cents: service.base_price_cents,
            price_formatted: format_usd(service.base_price_cents),
            is_active: service.is_active,
        }
    }
}

/// List active services, ordered by name.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<Json<Vec<ServiceResponse>>, ApiError> {
    let services = state.store.list_active_services()?;
    Ok(Json(services.iter().map(ServiceResponse::from).collect()))
}

/// Get a single service by ID.
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(service_id): Path<ServiceId>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let service = state
        .store
        .get_service(&service_id)?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;

    Ok(Json(ServiceResponse::from(&service)))
}

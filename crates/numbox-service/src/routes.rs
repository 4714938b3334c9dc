//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    health, payments, pricing, provider, rentals, services, users, verifications,
};
use crate::state::AppState;

/// Maximum concurrent inbound SMS deliveries. The provider retries on 503,
/// so shedding under load is safe.
const PROVIDER_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for the rest of the API.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /api/health` - Health check
///
/// ## Users (JWT auth)
/// - `GET /api/auth/user` - Get the calling user, creating it on first contact
/// - `GET /api/transactions` - List transaction history
///
/// ## Catalog (JWT auth)
/// - `GET /api/services` - List active services
/// - `GET /api/services/:id` - Get one service
/// - `GET /api/settings/pricing` - List pricing settings
///
/// ## Purchases (JWT auth)
/// - `POST /api/verifications` - Buy a verification
/// - `GET /api/verifications` - List the caller's verifications
/// - `GET /api/verifications/:id` - Get one verification
/// - `POST /api/rentals` - Rent a number
/// - `GET /api/rentals` - List the caller's rentals
/// - `GET /api/rentals/:id` - Get one rental
/// - `POST /api/create-payment-intent` - Start a credit purchase
/// - `POST /api/credits/purchase` - Credit a completed payment
///
/// ## Admin (X-Admin-Key auth)
/// - `PUT /api/settings/pricing/:service_type` - Update a base price
///
/// ## Provider (X-API-Key auth)
/// - `POST /api/provider/sms` - Record an inbound SMS code
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Inbound SMS deliveries are machine traffic and get their own, higher
    // concurrency limit.
    let provider_routes = Router::new()
        .route("/sms", post(provider::inbound_sms))
        .layer(ConcurrencyLimitLayer::new(PROVIDER_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Users
        .route("/auth/user", get(users::current_user))
        .route("/transactions", get(payments::list_transactions))
        // Catalog
        .route("/services", get(services::list_services))
        .route("/services/:id", get(services::get_service))
        // Verifications
        .route(
            "/verifications",
            get(verifications::list_verifications).post(verifications::create_verification),
        )
        .route(
            "/verifications/:id",
            get(verifications::get_verification),
        )
        // Rentals
        .route(
            "/rentals",
            get(rentals::list_rentals).post(rentals::create_rental),
        )
        .route("/rentals/:id", get(rentals::get_rental))
        // Payments
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/credits/purchase", post(payments::purchase_credits))
        // Pricing
        .route("/settings/pricing", get(pricing::list_pricing_settings))
        .route(
            "/settings/pricing/:service_type",
            put(pricing::update_pricing_setting),
        )
        // Provider (key auth, own limit)
        .nest("/provider", provider_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS))
        // Health is registered after the limit layer so probes are never shed
        .route("/health", get(health::health));

    Router::new()
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

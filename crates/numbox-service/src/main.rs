//! Service entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use numbox_service::{create_router, seed_store, AppState, ServiceConfig};
use numbox_store::RocksStore;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,numbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        stripe_configured = %config.stripe_api_key.is_some(),
        admin_key_configured = %config.admin_api_key.is_some(),
        provider_key_configured = %config.provider_api_key.is_some(),
        "Starting numbox service"
    );

    let store = Arc::new(RocksStore::open(&config.data_dir)?);

    // Pricing defaults and the service catalog are written on first boot;
    // later boots leave existing rows untouched.
    seed_store(store.as_ref())?;

    let state = AppState::new(store, config.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(listen_addr = %config.listen_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}

//! HMS Proxy Backend
//!
//! A backend proxy that keeps 100ms credentials out of the conferencing
//! client: it mints app tokens, creates rooms and checks room existence
//! against the management API, sourcing credentials from Supabase with a
//! short-lived in-memory cache and falling back to the process environment.

mod config;
mod credentials;
mod error;
mod hms;
mod http;
mod settings_store;
mod state;
mod token;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::Result;
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "hms-proxy";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; deployments set the process environment.
    let _ = dotenvy::dotenv();

    init_logging();
    tracing::info!("{} v{} starting", APP_NAME, VERSION);

    let config = Config::from_env();
    tracing::info!(
        management_token_configured = !config.management_token.is_empty(),
        settings_store_configured = config.has_settings_store(),
        hms_api_url = %config.hms_api_url,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config.clone())?);
    let app = create_router(state);

    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging with tracing
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hms_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Axum router configuration

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{create_room, get_room, health_check, issue_auth_token, liveness};

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // The conferencing client is a browser app served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Liveness and health endpoints
        .route("/", get(liveness))
        .route("/health", get(health_check))
        // Token issuance and room administration
        .route("/api/hms/auth-token", post(issue_auth_token))
        .route("/api/hms/rooms", post(create_room))
        .route("/api/hms/rooms/{room_id}", get(get_room))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

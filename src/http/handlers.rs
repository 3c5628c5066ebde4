//! HTTP request handlers
//!
//! Implements handlers for the proxy endpoints. Each handler resolves
//! credentials, performs at most one outbound platform call and translates
//! the outcome into a client-facing JSON response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ProxyError;
use crate::hms::{CreateRoomBody, RoomLookup};
use crate::state::AppState;
use crate::token;

/// Role embedded in issued tokens when the client does not ask for one.
const DEFAULT_ROLE: &str = "guest";

/// Client-facing HTTP error. Every failure leaves the handlers as a JSON
/// `{"error": ...}` body with the appropriate status.
#[derive(Debug)]
pub enum ApiError {
    /// A required client field is missing.
    Validation(String),
    /// Credentials needed for the operation are unavailable.
    Configuration(String),
    /// The platform answered with a non-success status.
    Upstream { status: u16, message: String },
    /// Anything else caught at the handler boundary.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Config(msg) => ApiError::Configuration(msg),
            ProxyError::Upstream { status, message } => ApiError::Upstream { status, message },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Liveness endpoint
/// GET /
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "HMS Proxy Backend is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Health check endpoint
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "hasToken": !state.config.management_token.is_empty(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Body of an auth-token request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenRequest {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Issue a signed app token for a room/user pair.
/// POST /api/hms/auth-token
pub async fn issue_auth_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut missing = Vec::new();
    if request.room_id.as_deref().map_or(true, str::is_empty) {
        missing.push("roomId");
    }
    if request.user_id.as_deref().map_or(true, str::is_empty) {
        missing.push("userId");
    }
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(" and ")
        )));
    }

    let room_id = request.room_id.unwrap_or_default();
    let user_id = request.user_id.unwrap_or_default();
    let role = request
        .role
        .filter(|role| !role.is_empty())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let credentials = state.resolver.resolve().await;
    if !credentials.has_app_keys() {
        tracing::error!("App key/secret not configured");
        return Err(ApiError::Configuration(
            "HMS app credentials not configured. Please set them in admin settings.".to_string(),
        ));
    }

    let token = token::issue_app_token(
        &credentials,
        &room_id,
        &user_id,
        &role,
        Utc::now().timestamp(),
    )?;

    tracing::info!(room = %room_id, user = %user_id, %role, "App token issued");
    Ok(Json(json!({ "token": token })))
}

/// Body of a create-room request.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a room on the platform.
/// POST /api/hms/rooms
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = request
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required field: name".to_string()))?;

    let credentials = state.resolver.resolve().await;
    if !credentials.has_management_token() {
        tracing::error!("Management token not configured");
        return Err(ApiError::Configuration(
            "HMS management token not configured. Please set it in admin settings.".to_string(),
        ));
    }

    let body = CreateRoomBody {
        name,
        description: request.description.unwrap_or_default(),
    };
    let room = state
        .hms
        .create_room(&credentials.management_token, &body)
        .await?;

    tracing::info!(room = %room.get("id").and_then(|v| v.as_str()).unwrap_or("?"), "Room created");
    Ok(Json(room))
}

/// Check whether a room exists on the platform.
/// GET /api/hms/rooms/{room_id}
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let credentials = state.resolver.resolve().await;
    if !credentials.has_management_token() {
        tracing::error!("Management token not configured");
        return Err(ApiError::Configuration(
            "HMS management token not configured. Please set it in admin settings.".to_string(),
        ));
    }

    match state
        .hms
        .get_room(&credentials.management_token, &room_id)
        .await?
    {
        RoomLookup::Found(room) => Ok(Json(room)),
        RoomLookup::Missing => Ok(Json(json!({ "exists": false }))),
    }
}

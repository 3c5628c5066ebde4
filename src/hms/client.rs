//! HTTP client for the 100ms management API.

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{ProxyError, Result};
use crate::hms::types::{CreateRoomBody, PlatformErrorBody, RoomLookup};

/// Management API client. Room-administration calls carry the management
/// token as bearer auth; the token itself is resolved per request.
#[derive(Clone)]
pub struct HmsClient {
    http_client: Client,
    base_url: String,
}

impl HmsClient {
    pub fn new(base_url: impl Into<String>, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /rooms`. Returns the created room verbatim.
    pub async fn create_room(&self, management_token: &str, body: &CreateRoomBody) -> Result<Value> {
        let response = self
            .http_client
            .post(self.build_url("/rooms"))
            .bearer_auth(management_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        interpret_create_room(status, &bytes)
    }

    /// `GET /rooms/{id}`. A platform 404 maps to [`RoomLookup::Missing`].
    pub async fn get_room(&self, management_token: &str, room_id: &str) -> Result<RoomLookup> {
        let response = self
            .http_client
            .get(self.build_url(&format!("/rooms/{}", room_id)))
            .bearer_auth(management_token)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        interpret_room_lookup(status, &bytes)
    }
}

/// Translate a non-success platform response into a client-facing error
/// carrying the platform's status and message. All handlers funnel upstream
/// failures through here.
pub(crate) fn platform_error(status: StatusCode, body: &[u8]) -> ProxyError {
    let parsed: PlatformErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("100ms API error")
                .to_string()
        });

    ProxyError::Upstream {
        status: status.as_u16(),
        message,
    }
}

fn interpret_create_room(status: StatusCode, body: &[u8]) -> Result<Value> {
    if !status.is_success() {
        return Err(platform_error(status, body));
    }
    Ok(serde_json::from_slice(body)?)
}

fn interpret_room_lookup(status: StatusCode, body: &[u8]) -> Result<RoomLookup> {
    if status == StatusCode::NOT_FOUND {
        return Ok(RoomLookup::Missing);
    }
    if !status.is_success() {
        return Err(platform_error(status, body));
    }
    Ok(RoomLookup::Found(serde_json::from_slice(body)?))
}

//! 100ms management API types.

use serde::{Deserialize, Serialize};

/// Body of a create-room call against the management API.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoomBody {
    pub name: String,
    pub description: String,
}

/// Error body shape the platform returns on non-success responses.
/// Either field may carry the human-readable message.
#[derive(Debug, Default, Deserialize)]
pub struct PlatformErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a room lookup. A platform 404 is a regular outcome here,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomLookup {
    /// The platform's room representation, passed through verbatim.
    Found(serde_json::Value),
    Missing,
}

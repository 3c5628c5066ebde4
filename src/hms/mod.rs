//! 100ms management API integration.

pub mod client;
pub mod types;

pub use client::HmsClient;
pub use types::{CreateRoomBody, RoomLookup};

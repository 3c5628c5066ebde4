//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the proxy endpoints
//! - Request handlers for token issuance and room administration
//! - Client-facing error mapping
//! - CORS middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;

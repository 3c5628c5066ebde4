use thiserror::Error;

/// Main error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// HTTP client error.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Listen address could not be parsed.
    #[error("Invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    /// Token signing error.
    #[error("Token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Credentials missing or incomplete.
    #[error("{0}")]
    Config(String),

    /// An upstream service returned a non-success response.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, ProxyError>;

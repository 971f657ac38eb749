//! Error types for the Asana closer.

use thiserror::Error;

/// Errors returned by the task API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credential was empty or rejected by Asana
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration is unusable (bad base URL, etc.)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether this error means the credential itself is bad.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Errors raised while reading the push event.
#[derive(Debug, Error)]
pub enum EventError {
    /// Event payload file could not be read
    #[error("Failed to read event payload {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Event payload was not a valid push event
    #[error("Failed to parse event payload: {0}")]
    Parse(#[from] serde_json::Error),
}

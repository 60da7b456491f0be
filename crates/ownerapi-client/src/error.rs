//! Error types for Owner API client operations

use thiserror::Error;

use crate::streaming::StreamError;

/// Result type alias for Owner API client operations
pub type Result<T> = std::result::Result<T, OwnerApiError>;

/// Errors that can occur during Owner API client operations
#[derive(Error, Debug)]
pub enum OwnerApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error (test-server harness)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Token endpoint rejected the credentials or returned an unusable body.
    ///
    /// Carries the raw HTTP status and raw body text so callers can inspect
    /// exactly what the server sent.
    #[error("Authentication failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// Failed to parse a vehicle API response as the `{response: ...}` envelope
    #[error("Failed to parse response to {command}: {detail}")]
    Parse { command: String, detail: String },

    /// No vehicle at the requested index in the account's vehicle list
    #[error("No vehicle at index {index} (account has {count})")]
    VehicleNotFound { index: usize, count: usize },

    /// Streaming error
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
}

impl OwnerApiError {
    /// Create a parse error for the given command path
    pub fn parse(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Parse {
            command: command.into(),
            detail: detail.into(),
        }
    }
}

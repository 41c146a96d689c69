//! Client error type

use thiserror::Error;

/// Errors returned by [`crate::ApiClient`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The body did not match the expected contract type
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The server speaks a different contract version
    #[error("API version mismatch: expected {expected}, got {found}")]
    VersionMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

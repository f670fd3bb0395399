/*
[INPUT]:  Error sources (serialization, routing, HTTP, response shape, request checks)
[OUTPUT]: Structured error type shared by the whole crate
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Rozert client
#[derive(Error, Debug)]
pub enum RozertError {
    /// A request value could not be rendered canonically
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Client or routing configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote API answered with a non-success status
    #[error("Transport error (status {status}): {body}")]
    Transport { status: StatusCode, body: String },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body does not match the expected shape
    #[error("Invalid response: {0}")]
    Validation(String),

    /// Request rejected locally before anything was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl RozertError {
    /// Whether a caller may reasonably retry the same call.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            RozertError::Http(err) => err.is_timeout() || err.is_connect(),
            RozertError::Transport { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Check if error comes from client configuration rather than the call
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RozertError::Configuration(_) | RozertError::UrlParse(_)
        )
    }

    /// HTTP status of a transport failure, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RozertError::Transport { status, .. } => Some(*status),
            RozertError::Http(err) => err.status(),
            _ => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        RozertError::Validation(message.into())
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        RozertError::InvalidRequest(message.into())
    }
}

/// Result type alias for Rozert operations
pub type Result<T> = std::result::Result<T, RozertError>;

//! Error types for the back-office API client

use thiserror::Error;

/// Errors that can occur when talking to the back-office API
///
/// Errors are `Clone` so they can travel inside actions back into reducers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered 401; the unauthorized signal has already been emitted
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session is no longer valid"))]
    Unauthorized {
        /// `message` field of the JSON error body, when present
        message: Option<String>,
    },

    /// The server answered with a non-success status
    #[error("Request failed (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Request {
        /// HTTP status code
        status: u16,
        /// `message` field of the JSON error body, when present
        message: Option<String>,
    },

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// No response at all (connection refused, DNS, TLS)
    #[error("Network failure: {0}")]
    Network(String),

    /// The response body did not have the expected shape
    #[error("Response decoding failed: {0}")]
    Decode(String),

    /// The client could not be built or a URL could not be formed
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Human-readable message supplied by the server, if any
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Request { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether this failure was a 401
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// A 401 without a server message
    #[must_use]
    pub const fn unauthorized() -> Self {
        Self::Unauthorized { message: None }
    }

    /// Shorthand for a request failure carrying a server message
    #[must_use]
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: Some(message.into()),
        }
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

//! CredHub error types using thiserror 2.0.
//!
//! Every failure surfaces as a distinct variant so callers can branch on it,
//! for example treating [`CredHubError::NotFound`] on delete as success.

use crate::credential::CredentialType;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// CredHub client errors.
#[derive(Error, Debug)]
pub enum CredHubError {
    /// Client-side validation failure; nothing was sent to the server
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Connection or transport failure
    #[error("CredHub unavailable: {0}")]
    ServiceUnavailable(String),

    /// Non-2xx response not covered by a more specific variant
    #[error("CredHub returned {status}: {message}")]
    Server {
        /// HTTP status of the response
        status: StatusCode,
        /// Server-provided message
        message: String,
        /// Server-provided error code, when the body carries one
        error_code: Option<String>,
    },

    /// The credential or permission does not exist (404)
    #[error("Not found: {message}")]
    NotFound {
        /// Server-provided message
        message: String,
        /// Server-provided error code, when the body carries one
        error_code: Option<String>,
    },

    /// The server rejected the operation for this credential (400/422)
    #[error("Unsupported operation ({status}): {message}")]
    UnsupportedOperation {
        /// HTTP status of the response
        status: StatusCode,
        /// Server-provided message
        message: String,
        /// Server-provided error code, when the body carries one
        error_code: Option<String>,
    },

    /// Response body does not match the expected shape
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The server reported a different credential type than requested
    #[error("Credential type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type the caller asked for
        expected: CredentialType,
        /// Type the server reported
        actual: CredentialType,
    },
}

/// Result type for CredHub operations.
pub type CredHubResult<T> = Result<T, CredHubError>;

impl CredHubError {
    /// HTTP status carried by server-side errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } | Self::UnsupportedOperation { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Error code from the server's response body.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Server { error_code, .. }
            | Self::NotFound { error_code, .. }
            | Self::UnsupportedOperation { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    /// Check if the server reported the target as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is transient.
    ///
    /// Classification only: this library never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ServiceUnavailable(_) => true,
            Self::Server { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a service unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Translate a non-2xx response into the matching error variant.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let (message, error_code) = parse_error_body(status, body);

        match status {
            StatusCode::NOT_FOUND => Self::NotFound {
                message,
                error_code,
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::UnsupportedOperation {
                    status,
                    message,
                    error_code,
                }
            }
            _ => Self::Server {
                status,
                message,
                error_code,
            },
        }
    }
}

impl From<reqwest::Error> for CredHubError {
    fn from(err: reqwest::Error) -> Self {
        Self::ServiceUnavailable(err.to_string())
    }
}

/// CredHub answers `{"error": ".."}`; the UAA in front of it answers
/// `{"error": "<code>", "error_description": ".."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

fn parse_error_body(status: StatusCode, body: &str) -> (String, Option<String>) {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match (parsed.error, parsed.error_description) {
            (code, Some(description)) => return (description, code),
            (Some(message), None) => return (message, None),
            (None, None) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        let reason = status.canonical_reason().unwrap_or("unknown status");
        (reason.to_string(), None)
    } else {
        (trimmed.to_string(), None)
    }
}

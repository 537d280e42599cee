//! Error types for the tether-rpc crate.
//!
//! [`RemoteApiError`] is the only error callers of [`crate::ApiClient`] ever
//! see. [`InterpretError`] is what response interpreters return before the
//! dispatch core folds it into a `RemoteApiError`.

use tether_types::StatusCode;

use crate::protocol::ErrorEnvelope;

/// Failure of a remote API call, tagged with a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Remote API error {status}{}",
    .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
)]
pub struct RemoteApiError {
    status: StatusCode,
    message: Option<String>,
}

impl RemoteApiError {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// The error every unexpected failure is collapsed into.
    #[must_use]
    pub fn illegal_response() -> Self {
        Self::new(StatusCode::IllegalResponse)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn code(&self) -> i32 {
        self.status.code()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<ErrorEnvelope> for RemoteApiError {
    fn from(envelope: ErrorEnvelope) -> Self {
        Self {
            status: envelope.status,
            message: envelope.message,
        }
    }
}

/// Why a response body could not be turned into the expected value.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response body is not a JSON object")]
    NotAnObject,

    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    #[error("Expected '{0}' to be an array")]
    NotAnArray(&'static str),

    #[error("Expected a scalar value, got {0}")]
    NotScalar(&'static str),

    #[error("Expected {expected} elements, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("Malformed error envelope: {0}")]
    MalformedError(String),

    /// The server answered with a well-formed error envelope.
    #[error(transparent)]
    Remote(#[from] RemoteApiError),
}

pub type Result<T> = std::result::Result<T, RemoteApiError>;

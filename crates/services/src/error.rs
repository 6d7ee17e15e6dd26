//! Shared error types for the services crate.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use trivia_core::model::QuestionError;

/// Lower-cased message fragments that mark a transport-level failure
/// (connection refused, CORS rejection, fetch-level failure).
const NETWORK_FAILURE_PATTERNS: &[&str] = &[
    "failed to fetch",
    "networkerror",
    "network error",
    "network request failed",
    "load failed",
    "cors",
    "connection refused",
    "error sending request",
    "dns error",
];

/// Errors emitted by the HTTP client and the API surface.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-2xx response. `message` is derived from the payload's `detail`.
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        payload: Value,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request was aborted")]
    Aborted,
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a `reqwest` failure.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let message = error_chain(err);
        if err.is_builder() {
            Self::InvalidUrl(message)
        } else if err.is_decode() {
            Self::Decode(message)
        } else {
            Self::Network(message)
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error means the backend endpoint does not exist or cannot
    /// be reached at all, in which case the mock provider takes over.
    ///
    /// True for HTTP 404 and 405, for any transport failure, and for any
    /// other error (HTTP included) whose message matches a network/CORS
    /// failure pattern.
    #[must_use]
    pub fn is_endpoint_missing(&self) -> bool {
        match self {
            Self::Http {
                status, message, ..
            } => {
                matches!(*status, StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED)
                    || looks_like_network_failure(message)
            }
            Self::Network(_) => true,
            Self::Timeout(_) | Self::Aborted => false,
            other => looks_like_network_failure(&other.to_string()),
        }
    }
}

#[must_use]
pub fn looks_like_network_failure(message: &str) -> bool {
    let lowered = message.to_lowercase();
    NETWORK_FAILURE_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

/// Errors emitted by gameplay operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("Please enter your name to start")]
    MissingPlayerName,
    #[error("a request is already in progress")]
    Busy,
    #[error("action is not available right now")]
    InvalidPhase,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the admin service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] QuestionError),
    #[error("an admin request is already in progress")]
    Busy,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http(status: StatusCode) -> ApiError {
        ApiError::Http {
            status,
            message: "nope".into(),
            payload: json!({ "detail": "nope" }),
        }
    }

    #[test]
    fn missing_endpoint_statuses_trigger_fallback() {
        assert!(http(StatusCode::NOT_FOUND).is_endpoint_missing());
        assert!(http(StatusCode::METHOD_NOT_ALLOWED).is_endpoint_missing());
        assert!(!http(StatusCode::INTERNAL_SERVER_ERROR).is_endpoint_missing());
        assert!(!http(StatusCode::UNPROCESSABLE_ENTITY).is_endpoint_missing());
    }

    #[test]
    fn transport_failures_trigger_fallback() {
        assert!(ApiError::Network("connection refused".into()).is_endpoint_missing());
        assert!(!ApiError::Timeout(Duration::from_secs(15)).is_endpoint_missing());
        assert!(!ApiError::Aborted.is_endpoint_missing());
    }

    #[test]
    fn network_patterns_match_messages() {
        assert!(looks_like_network_failure("TypeError: Failed to fetch"));
        assert!(looks_like_network_failure("Blocked by CORS policy"));
        assert!(
            ApiError::Decode("NetworkError when attempting to fetch resource".into())
                .is_endpoint_missing()
        );
        assert!(!ApiError::Decode("expected value at line 1".into()).is_endpoint_missing());
        let gateway = ApiError::Http {
            status: StatusCode::BAD_GATEWAY,
            message: "NetworkError when attempting to fetch resource".into(),
            payload: Value::Null,
        };
        assert!(gateway.is_endpoint_missing());
        assert!(!http(StatusCode::BAD_GATEWAY).is_endpoint_missing());
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let err = ApiError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "request timed out after 15s");
        let err = ApiError::Timeout(Duration::from_millis(100));
        assert_eq!(err.to_string(), "request timed out after 100ms");
    }
}

//! Failure types produced by the retrying fetcher.

use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Failure category shared by fetch results and user-facing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkError,
    NotFound,
    RateLimited,
    ServerError,
    Unknown,
    /// Upstream `type` passed through unchanged
    Other(String),
}

impl ErrorKind {
    /// Kind implied by an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorKind::NotFound,
            429 => ErrorKind::RateLimited,
            500..=599 => ErrorKind::ServerError,
            _ => ErrorKind::Unknown,
        }
    }

    /// Kind named by an upstream `type` string
    pub fn from_type(error_type: &str) -> Self {
        match error_type {
            "network_error" => ErrorKind::NetworkError,
            "not_found" => ErrorKind::NotFound,
            "rate_limited" | "rate_limit" => ErrorKind::RateLimited,
            "server_error" => ErrorKind::ServerError,
            "unknown" => ErrorKind::Unknown,
            other => ErrorKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::NetworkError => "network_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Unknown => "unknown",
            ErrorKind::Other(other) => other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure (DNS, connect, reset, body read)
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<reqwest::Error>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

/// Error body returned by the Jikan API; every field is optional
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// A non-success HTTP outcome, normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status {status} ({}): {message}", type_label(.error_type))]
pub struct ClassifiedError {
    pub status: u16,
    pub kind: ErrorKind,
    /// Upstream `type` field, when the body carried one
    pub error_type: Option<String>,
    pub message: String,
    pub error: String,
}

impl ClassifiedError {
    /// Build from a response status and its raw body
    ///
    /// Absent or unparsable bodies fall back to the status reason phrase.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        let reason = status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();

        Self {
            status: status.as_u16(),
            kind: ErrorKind::from_status(status.as_u16()),
            error_type: parsed.error_type,
            message: parsed
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| reason.clone()),
            error: parsed.error.filter(|e| !e.is_empty()).unwrap_or(reason),
        }
    }

    /// Upstream type, or `api_error` when none was given
    pub fn type_name(&self) -> &str {
        type_label(&self.error_type)
    }
}

fn type_label(error_type: &Option<String>) -> &str {
    error_type.as_deref().unwrap_or("api_error")
}

/// Everything a fetch can fail with
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ClassifiedError),

    #[error("failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status for API failures, None otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Api(err) => Some(err.status),
            _ => None,
        }
    }
}

//! Maps fetch failures to stable, user-facing errors.

use super::error::{ErrorKind, FetchError};
use thiserror::Error;

/// Error shown to users: status, kind, and a readable message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({kind}, status {status})")]
pub struct ApiError {
    /// HTTP status; 0 for network failures
    pub status: u16,
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    fn new(message: impl Into<String>, status: u16, kind: ErrorKind) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    /// Longer explanation suitable for an error banner
    pub fn friendly_message(&self) -> &str {
        match self.kind {
            ErrorKind::NetworkError => {
                "Could not connect to the server. Check your internet connection."
            }
            ErrorKind::NotFound => "The anime you are looking for does not exist.",
            ErrorKind::RateLimited => {
                "You have made too many requests. Wait a few seconds and try again."
            }
            ErrorKind::ServerError => "The server is experiencing problems. Try again later.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.",
            ErrorKind::Other(_) => &self.message,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        classify(&error)
    }
}

/// Classify a fetch failure; pure, never retries
pub fn classify(error: &FetchError) -> ApiError {
    match error {
        FetchError::Transport(_) => ApiError::new(
            "Connection error. Please check your internet connection.",
            0,
            ErrorKind::NetworkError,
        ),
        FetchError::Api(api) => match api.status {
            404 => ApiError::new("Anime not found", 404, ErrorKind::NotFound),
            429 => ApiError::new(
                "Too many requests. Please wait a moment before trying again.",
                429,
                ErrorKind::RateLimited,
            ),
            500 | 502 | 503 => ApiError::new(
                "Server error. Please try again later.",
                api.status,
                ErrorKind::ServerError,
            ),
            status => {
                let message = if api.message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    api.message.clone()
                };
                ApiError::new(message, status, ErrorKind::from_type(api.type_name()))
            }
        },
        FetchError::Parse(e) => ApiError::new(e.to_string(), 500, ErrorKind::Unknown),
    }
}

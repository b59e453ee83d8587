//! Error type for API operations

use thiserror::Error;

/// Error returned by marketplace API calls
///
/// Non-success responses are mapped to a category derived from the HTTP
/// status, so callers can branch on what happened without re-parsing
/// status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unauthorized (status {0})")]
    Unauthorized(u16),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by the API")]
    RateLimited,

    #[error("Server error (status {0})")]
    Server(u16),

    #[error("Unexpected response (status {status}): {body}")]
    Unexpected { status: u16, body: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// True when retrying the same request later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Http(_) | ApiError::RateLimited | ApiError::Server(_)
        )
    }
}

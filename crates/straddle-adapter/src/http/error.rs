/*
[INPUT]:  Error sources (HTTP, API error bodies, serialization, validation, config)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ErrorResponse;

/// Main error type for the Straddle adapter
#[derive(Error, Debug)]
pub enum StraddleError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<Box<ErrorResponse>>,
    },

    /// API key missing, invalid, or not allowed to perform the call
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Requested resource does not exist
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Rate limit exceeded; `retry_after` is the server's `Retry-After` in seconds
    #[error("Rate limit exceeded{}", .retry_after.map(|secs| format!(", retry after {secs}s")).unwrap_or_default())]
    RateLimit { retry_after: Option<u64> },

    /// Request timed out
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Client-side validation rejected a value
    #[error("Invalid data at `{field}`: {reason}")]
    InvalidData { field: String, reason: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StraddleError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            StraddleError::Http(err) => err.is_timeout() || err.is_connect(),
            StraddleError::RateLimit { .. } | StraddleError::Timeout { .. } => true,
            StraddleError::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Get retry delay in seconds, when the server dictated one
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            StraddleError::RateLimit { retry_after } => *retry_after,
            StraddleError::Timeout { .. } => Some(1),
            _ => None,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, StraddleError::Authentication { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StraddleError::Api { status, .. } | StraddleError::Authentication { status, .. } => {
                Some(*status)
            }
            StraddleError::NotFound { .. } => Some(404),
            StraddleError::RateLimit { .. } => Some(429),
            StraddleError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Parsed API error body, when the server sent one
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            StraddleError::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        StraddleError::Api {
            status: status.as_u16(),
            message: message.into(),
            body: None,
        }
    }

    /// Create a validation error for a dotted field path
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StraddleError::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Map a non-success HTTP response into the matching error variant.
    ///
    /// `body` is the raw response text; when it parses as the API's error envelope
    /// the title/detail are used as the message and the envelope is kept.
    pub fn from_response(status: StatusCode, body: &str, retry_after: Option<u64>) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let message = match &parsed {
            Some(resp) => resp.error.summary(),
            None if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            None => body.trim().to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StraddleError::Authentication {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => StraddleError::NotFound { message },
            StatusCode::TOO_MANY_REQUESTS => StraddleError::RateLimit { retry_after },
            _ => StraddleError::Api {
                status: status.as_u16(),
                message,
                body: parsed.map(Box::new),
            },
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 409 | 429) || status >= 500
}

/// Result type alias for Straddle operations
pub type Result<T> = std::result::Result<T, StraddleError>;

//! Error types for Dynatrace API operations.

use thiserror::Error;

/// Errors that can occur during Dynatrace API operations.
#[derive(Debug, Error)]
pub enum DynatraceError {
    /// Configuration is missing or incomplete.
    #[error("Dynatrace configuration required: {0}")]
    ConfigMissing(String),

    /// Invalid caller-supplied argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity or entity type not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("Dynatrace API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl DynatraceError {
    /// HTTP status code returned by the server, if the error came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Turn a 404 API error into [`DynatraceError::NotFound`].
    pub(crate) fn or_not_found(self, entity_type: &'static str, id: &str) -> Self {
        match self {
            Self::ApiError {
                status_code: Some(404),
                ..
            } => Self::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// Result type alias for Dynatrace operations.
pub type Result<T> = core::result::Result<T, DynatraceError>;

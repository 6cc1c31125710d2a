//! Error types for Holiday Reminder Agent Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Holiday Reminder Agent Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error reaching the holiday API
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned 404 (unknown country code)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream rate limit hit
    #[error("Rate limited (retry after {retry_after:?}s)")]
    RateLimited {
        /// Seconds to wait, from the Retry-After header when present
        retry_after: Option<u64>,
    },

    /// Upstream responded with an unexpected status or body
    #[error("API error: {0}")]
    Api(String),

    /// Agent runtime error
    #[error("Agent error: {0}")]
    Agent(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::RateLimited { .. } => 429,
            Error::Transport(_) | Error::Api(_) => 502,
            _ => 500,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(Error::Validation("bad".to_string()).status_code(), 400);
        assert_eq!(Error::NotFound("XX".to_string()).status_code(), 404);
        assert_eq!(
            Error::RateLimited { retry_after: None }.status_code(),
            429
        );
        assert_eq!(Error::Api("boom".to_string()).status_code(), 502);
        assert_eq!(Error::Agent("boom".to_string()).status_code(), 500);
        assert_eq!(Error::Config("missing".to_string()).status_code(), 500);
        assert_eq!(Error::Internal("boom".to_string()).status_code(), 500);
    }
}

//! Overpass error types

use thiserror::Error;

/// Errors that can occur while querying Overpass
#[derive(Debug, Error)]
pub enum OverpassError {
    /// Connection to a mirror failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A mirror answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// A mirror answered with a body that is not Overpass JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A mirror is rate limiting us
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// A mirror did not answer in time
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Every configured mirror failed
    #[error("All {attempts} Overpass mirrors failed, last error: {last_error}")]
    AllMirrorsFailed {
        /// Number of mirrors that were tried
        attempts: usize,
        /// Error reported by the last mirror
        last_error: String,
    },

    /// The caller cancelled the search
    #[error("Search cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl OverpassError {
    /// Returns true if the search may succeed when repeated later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded
                | Self::Timeout { .. }
                | Self::AllMirrorsFailed { .. }
        )
    }
}

//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during reverse geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// The body could not be parsed
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The service had no place for the coordinate
    #[error("No place found at {0}")]
    NotFound(String),

    /// Rate limited by the service
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,

    /// The caller cancelled the lookup
    #[error("Geocoding cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

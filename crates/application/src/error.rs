//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Place discovery failed on every source
    #[error("Discovery unavailable after {attempts} attempt(s): {message}")]
    DiscoveryUnavailable {
        /// Number of sources that were tried
        attempts: usize,
        /// Last reported failure
        message: String,
    },

    /// Routing service failed
    #[error("Routing failed: {0}")]
    RoutingFailed(String),

    /// Reverse geocoding failed
    #[error("Geocoding failed: {0}")]
    GeocodeFailed(String),

    /// The user refused location access
    #[error("Location permission denied")]
    LocationDenied,

    /// No position could be obtained
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// The operation was cancelled or superseded
    #[error("Operation cancelled")]
    Cancelled,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DiscoveryUnavailable { .. }
                | Self::RoutingFailed(_)
                | Self::GeocodeFailed(_)
                | Self::LocationUnavailable(_)
        )
    }
}

//! Routing error types

use thiserror::Error;

/// Errors that can occur while requesting a route
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Routing connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Routing request failed: {0}")]
    RequestFailed(String),

    /// The body was not a valid route response
    #[error("Routing parse error: {0}")]
    ParseError(String),

    /// The service reported that no route exists
    #[error("No route found: {0}")]
    NoRoute(String),

    /// Request timeout
    #[error("Routing request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The caller cancelled the request
    #[error("Routing cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

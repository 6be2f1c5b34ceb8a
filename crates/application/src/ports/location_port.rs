//! Host location port
//!
//! Abstracts the platform geolocation service (browser, OS, or a fixed
//! configured position on a server).

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRequest {
    /// Ask for a GPS-grade fix
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Accept a cached fix this old
    pub maximum_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// A resolved position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Reported coordinate
    pub location: GeoLocation,
    /// Accuracy radius in meters, when known
    pub accuracy_m: Option<f64>,
}

/// Why no position was produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused access
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform could not produce a fix
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Port for the host location service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Obtain the current position
    async fn current_position(&self, request: PositionRequest) -> Result<PositionFix, LocationError>;
}

//! Location adapter - Implements LocationPort from configuration
//!
//! A server has no geolocation hardware. The host position is either a
//! fixed point from configuration or unavailable.

use application::ports::{LocationError, LocationPort, PositionFix, PositionRequest};
use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use tracing::debug;

/// Location service backed by a configured position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfiguredLocationAdapter {
    fix: Option<PositionFix>,
}

impl ConfiguredLocationAdapter {
    /// Always report `location`
    pub const fn fixed(location: GeoLocation, accuracy_m: Option<f64>) -> Self {
        Self {
            fix: Some(PositionFix {
                location,
                accuracy_m,
            }),
        }
    }

    /// Never produce a position
    pub const fn unavailable() -> Self {
        Self { fix: None }
    }
}

#[async_trait]
impl LocationPort for ConfiguredLocationAdapter {
    async fn current_position(
        &self,
        request: PositionRequest,
    ) -> Result<PositionFix, LocationError> {
        debug!(high_accuracy = request.high_accuracy, "Position requested");
        self.fix.ok_or_else(|| {
            LocationError::Unavailable("no fixed position configured".to_string())
        })
    }
}

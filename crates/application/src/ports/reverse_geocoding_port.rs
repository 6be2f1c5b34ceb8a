//! Reverse geocoding port

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::error::ApplicationError;

/// Port for coordinate to area-label lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReverseGeocodingPort: Send + Sync {
    /// Resolve `location` to a short human-readable label
    async fn reverse(
        &self,
        location: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<String, ApplicationError>;
}

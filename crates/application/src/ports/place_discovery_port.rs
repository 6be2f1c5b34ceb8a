//! Place discovery port
//!
//! Finds raw geographic features around a point. The infrastructure adapter
//! implements it with the Overpass client and its mirror failover.

use async_trait::async_trait;
use domain::entities::RawElement;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::error::ApplicationError;

/// Port for radius searches over open geodata
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaceDiscoveryPort: Send + Sync {
    /// Find candidate features within `radius_meters` of `center`
    ///
    /// Fails with [`ApplicationError::DiscoveryUnavailable`] when no source
    /// answered, or [`ApplicationError::Cancelled`] when `cancel` fired.
    async fn find_places(
        &self,
        center: GeoLocation,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawElement>, ApplicationError>;
}

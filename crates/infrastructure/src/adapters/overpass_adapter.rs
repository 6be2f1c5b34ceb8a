//! Overpass adapter - Implements PlaceDiscoveryPort using integration_overpass

use application::error::ApplicationError;
use application::ports::PlaceDiscoveryPort;
use async_trait::async_trait;
use domain::entities::RawElement;
use domain::value_objects::GeoLocation;
use integration_overpass::{OverpassClient, OverpassConfig, OverpassError, PlaceSearchClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Adapter for place discovery through the Overpass mirror pool
pub struct OverpassDiscoveryAdapter<C = OverpassClient> {
    client: C,
}

impl<C> std::fmt::Debug for OverpassDiscoveryAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassDiscoveryAdapter")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl OverpassDiscoveryAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &OverpassConfig) -> Result<Self, ApplicationError> {
        let client = OverpassClient::new(config).map_err(map_overpass_error)?;
        Ok(Self { client })
    }
}

impl<C: PlaceSearchClient> OverpassDiscoveryAdapter<C> {
    /// Wrap an existing client
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }
}

/// Map an Overpass error onto the application taxonomy
pub(crate) fn map_overpass_error(error: OverpassError) -> ApplicationError {
    match error {
        OverpassError::AllMirrorsFailed {
            attempts,
            last_error,
        } => ApplicationError::DiscoveryUnavailable {
            attempts,
            message: last_error,
        },
        OverpassError::Cancelled => ApplicationError::Cancelled,
        OverpassError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::DiscoveryUnavailable {
            attempts: 1,
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl<C: PlaceSearchClient> PlaceDiscoveryPort for OverpassDiscoveryAdapter<C> {
    #[instrument(skip_all, fields(center = %center, radius_meters = radius_meters))]
    async fn find_places(
        &self,
        center: GeoLocation,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawElement>, ApplicationError> {
        let elements = self
            .client
            .search(center, radius_meters, cancel)
            .await
            .map_err(map_overpass_error)?;

        debug!(count = elements.len(), "Overpass returned elements");
        Ok(elements)
    }
}

//! Geocoding adapter - Implements ReverseGeocodingPort using integration_geocoding

use application::error::ApplicationError;
use application::ports::ReverseGeocodingPort;
use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use integration_geocoding::{
    GeocodingError, NominatimClient, NominatimConfig, ReverseGeocodingClient,
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Adapter for reverse geocoding through Nominatim
pub struct NominatimGeocodingAdapter<C = NominatimClient> {
    client: C,
}

impl<C> std::fmt::Debug for NominatimGeocodingAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocodingAdapter")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl NominatimGeocodingAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimClient::new(config).map_err(map_geocoding_error)?;
        Ok(Self { client })
    }
}

impl<C: ReverseGeocodingClient> NominatimGeocodingAdapter<C> {
    /// Wrap an existing client
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }
}

fn map_geocoding_error(error: GeocodingError) -> ApplicationError {
    match error {
        GeocodingError::Cancelled => ApplicationError::Cancelled,
        GeocodingError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::GeocodeFailed(other.to_string()),
    }
}

#[async_trait]
impl<C: ReverseGeocodingClient> ReverseGeocodingPort for NominatimGeocodingAdapter<C> {
    #[instrument(skip_all, fields(location = %location))]
    async fn reverse(
        &self,
        location: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<String, ApplicationError> {
        self.client
            .reverse(location, cancel)
            .await
            .map_err(map_geocoding_error)
    }
}

//! Routing adapter - Implements RoutingPort using integration_routing

use application::error::ApplicationError;
use application::ports::{RoutedPath, RoutingPort};
use async_trait::async_trait;
use domain::entities::RouteSummary;
use domain::value_objects::GeoLocation;
use integration_routing::{DrivingRoute, OsrmClient, RoutingClient, RoutingConfig, RoutingError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Adapter for driving routes through OSRM
pub struct OsrmRoutingAdapter<C = OsrmClient> {
    client: C,
}

impl<C> std::fmt::Debug for OsrmRoutingAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmRoutingAdapter")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl OsrmRoutingAdapter {
    /// Create an adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &RoutingConfig) -> Result<Self, ApplicationError> {
        let client = OsrmClient::new(config).map_err(map_routing_error)?;
        Ok(Self { client })
    }
}

impl<C: RoutingClient> OsrmRoutingAdapter<C> {
    /// Wrap an existing client
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }
}

fn map_routing_error(error: RoutingError) -> ApplicationError {
    match error {
        RoutingError::Cancelled => ApplicationError::Cancelled,
        RoutingError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::RoutingFailed(other.to_string()),
    }
}

fn to_routed_path(route: DrivingRoute) -> RoutedPath {
    let summary = (route.distance_meters > 0.0).then_some(RouteSummary {
        distance_meters: route.distance_meters,
        duration_seconds: route.duration_seconds,
    });
    RoutedPath {
        path: route.path,
        summary,
    }
}

#[async_trait]
impl<C: RoutingClient> RoutingPort for OsrmRoutingAdapter<C> {
    #[instrument(skip_all, fields(from = %from, to = %to))]
    async fn driving_route(
        &self,
        from: GeoLocation,
        to: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<RoutedPath, ApplicationError> {
        let route = self
            .client
            .driving_route(from, to, cancel)
            .await
            .map_err(map_routing_error)?;

        debug!(points = route.path.len(), "Driving route received");
        Ok(to_routed_path(route))
    }
}

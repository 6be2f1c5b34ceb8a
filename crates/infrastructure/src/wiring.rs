//! Service wiring
//!
//! Builds the adapters and application services described by an
//! [`AppConfig`]. Shared by the HTTP server and the CLI.

use std::sync::Arc;

use application::ports::{LocationPort, PlaceDiscoveryPort, ReverseGeocodingPort, RoutingPort};
use application::{
    ApplicationError, DiscoveryCoordinator, GeocodeGate, OrgClassifier, ReverseGeocoder,
    RouteEngine,
};
use tracing::info;

use crate::adapters::{
    ConfiguredLocationAdapter, NominatimGeocodingAdapter, OsrmRoutingAdapter,
    OverpassDiscoveryAdapter,
};
use crate::config::AppConfig;

/// Everything the presentation layers need
#[derive(Debug, Clone)]
pub struct AppServices {
    /// Discovery orchestration
    pub coordinator: Arc<DiscoveryCoordinator>,
    /// Classifier with the configured keyword table
    pub classifier: OrgClassifier,
}

/// Build the production services from configuration
pub fn build_services(config: &AppConfig) -> Result<AppServices, ApplicationError> {
    let places: Arc<dyn PlaceDiscoveryPort> =
        Arc::new(OverpassDiscoveryAdapter::new(&config.overpass)?);
    let geocoding: Arc<dyn ReverseGeocodingPort> =
        Arc::new(NominatimGeocodingAdapter::new(&config.geocoding)?);
    let routing: Arc<dyn RoutingPort> = Arc::new(OsrmRoutingAdapter::new(&config.routing)?);

    let location = match config
        .location
        .fixed_location()
        .map_err(ApplicationError::Configuration)?
    {
        Some(position) => ConfiguredLocationAdapter::fixed(
            position,
            config.location.fixed.and_then(|f| f.accuracy_m),
        ),
        None => ConfiguredLocationAdapter::unavailable(),
    };

    // Built once per process, so this gate spaces every outbound lookup
    let gate = Arc::new(GeocodeGate::new(config.discovery.geocode_min_interval()));
    let services = assemble(config, places, geocoding, routing, Arc::new(location), gate)?;

    info!(
        mirrors = config.overpass.mirrors.len(),
        radius_m = config.discovery.default_radius_m,
        "Discovery services ready"
    );
    Ok(services)
}

/// Build the services over arbitrary port implementations
pub fn assemble(
    config: &AppConfig,
    places: Arc<dyn PlaceDiscoveryPort>,
    geocoding: Arc<dyn ReverseGeocodingPort>,
    routing: Arc<dyn RoutingPort>,
    location: Arc<dyn LocationPort>,
    gate: Arc<GeocodeGate>,
) -> Result<AppServices, ApplicationError> {
    let discovery = &config.discovery;
    let classifier = OrgClassifier::new(config.classifier.table())?;

    let geocoder =
        ReverseGeocoder::new(geocoding, gate).with_timeout(discovery.geocode_timeout());
    let routes = RouteEngine::new(routing).with_timeout(discovery.route_timeout());

    let coordinator = DiscoveryCoordinator::new(
        places,
        geocoder,
        classifier.clone(),
        routes,
        discovery.to_discovery_config(&config.location),
    )
    .with_location_port(location);

    Ok(AppServices {
        coordinator: Arc::new(coordinator),
        classifier,
    })
}

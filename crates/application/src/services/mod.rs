//! Application services - Use case implementations

mod discovery_service;
mod org_classifier;
mod reverse_geocoder;
mod route_engine;

pub use discovery_service::{
    DiscoveryConfig, DiscoveryCoordinator, DiscoverySnapshot, DiscoveryStatus, OrgFilter,
};
pub use org_classifier::{KeywordAdditions, KeywordTable, OrgClassifier, VERIFIED_MIN_TAGS};
pub use reverse_geocoder::{
    DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MIN_INTERVAL, FALLBACK_LABEL, GeocodeGate, ReverseGeocoder,
};
pub use route_engine::{DEFAULT_ROUTE_TIMEOUT, RouteEngine, RouteKey};

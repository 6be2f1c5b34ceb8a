//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_port;
mod place_discovery_port;
mod reverse_geocoding_port;
mod routing_port;

#[cfg(test)]
pub use location_port::MockLocationPort;
pub use location_port::{LocationError, LocationPort, PositionFix, PositionRequest};
#[cfg(test)]
pub use place_discovery_port::MockPlaceDiscoveryPort;
pub use place_discovery_port::PlaceDiscoveryPort;
#[cfg(test)]
pub use reverse_geocoding_port::MockReverseGeocodingPort;
pub use reverse_geocoding_port::ReverseGeocodingPort;
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RoutedPath, RoutingPort};

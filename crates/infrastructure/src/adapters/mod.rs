//! Adapters implementing application ports over the integration crates

mod geocoding_adapter;
mod location_adapter;
mod overpass_adapter;
mod routing_adapter;

pub use geocoding_adapter::NominatimGeocodingAdapter;
pub use location_adapter::ConfiguredLocationAdapter;
pub use overpass_adapter::OverpassDiscoveryAdapter;
pub use routing_adapter::OsrmRoutingAdapter;

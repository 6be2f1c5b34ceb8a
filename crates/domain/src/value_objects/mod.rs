//! Value Objects - Immutable, identity-less domain primitives

mod bounding_box;
mod distance;
mod geo_location;
mod location_state;

pub use bounding_box::BoundingBox;
pub use distance::Distance;
pub use geo_location::{GeoLocation, GridKey, InvalidCoordinates};
pub use location_state::{LocationEvent, LocationState};

//! Domain entities - Objects with identity

mod organization;
mod raw_element;
mod route;

pub use organization::{
    ADDRESS_NOT_LISTED, GivingType, MapMarker, NOT_LISTED, OrgCategory, Organization,
};
pub use raw_element::{ElementKind, RawElement};
pub use route::{RouteResult, RouteSummary, ViewportFit};

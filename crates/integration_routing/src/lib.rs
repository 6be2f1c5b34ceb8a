//! Driving route integration for GivingZone
//!
//! Requests a full-overview driving route from an
//! [OSRM](https://project-osrm.org) server and decodes its GeoJSON geometry
//! into a coordinate path.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{OsrmClient, RoutingClient, RoutingConfig};
//!
//! let client = OsrmClient::new(&RoutingConfig::default())?;
//! let route = client
//!     .driving_route(GeoLocation::accra(), GeoLocation::kumasi(), &CancellationToken::new())
//!     .await?;
//! println!("{} points, {:.0} m", route.path.len(), route.distance_meters);
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{OsrmClient, RoutingClient};
pub use config::RoutingConfig;
pub use error::RoutingError;
pub use models::{DrivingRoute, parse_route};

//! Overpass integration for GivingZone
//!
//! Finds places of worship, NGOs, charities and social facilities around a
//! point using the [Overpass API](https://wiki.openstreetmap.org/wiki/Overpass_API).
//!
//! # Architecture
//!
//! [`PlaceSearchClient`] defines the interface, implemented by
//! [`OverpassClient`]. A query is built once by [`OverpassQuery`] and sent to
//! an ordered list of mirrors, one after the other, until a mirror answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_overpass::{OverpassClient, OverpassConfig, PlaceSearchClient};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = OverpassClient::new(&OverpassConfig::default())?;
//! let elements = client
//!     .search(GeoLocation::accra(), 5000, &CancellationToken::new())
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;
mod query;

pub use client::{OverpassClient, PlaceSearchClient};
pub use config::OverpassConfig;
pub use error::OverpassError;
pub use models::parse_response;
pub use query::OverpassQuery;

//! Reverse geocoding integration for GivingZone
//!
//! Turns a coordinate into a short area label ("Osu, Accra") using the
//! [Nominatim](https://nominatim.openstreetmap.org) `/reverse` endpoint.
//!
//! This crate only performs the HTTP call and label assembly. Rate gating,
//! caching and the fallback label live in the application layer, which owns
//! the rate gate.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{NominatimClient, NominatimConfig, ReverseGeocodingClient};
//!
//! let client = NominatimClient::new(&NominatimConfig::default())?;
//! let label = client.reverse(GeoLocation::accra(), &CancellationToken::new()).await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{NominatimClient, ReverseGeocodingClient};
pub use config::NominatimConfig;
pub use error::GeocodingError;
pub use models::{AddressBreakdown, ReverseResult};

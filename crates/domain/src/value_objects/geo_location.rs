//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo_math;

/// A WGS-84 coordinate with latitude and longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180] (NaN is rejected as well)
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        geo_math::distance_meters(self, other)
    }

    /// Grid cell of this location at the given number of decimal places
    ///
    /// Two locations share a key when both coordinates round to the same value,
    /// e.g. 3 decimals groups points into cells of roughly 110 m.
    #[must_use]
    pub fn grid_key(&self, decimals: u32) -> GridKey {
        let scale = 10f64.powi(decimals as i32);
        GridKey {
            lat: (self.latitude * scale).round() as i64,
            lon: (self.longitude * scale).round() as i64,
        }
    }
}

/// Rounded coordinate usable as a hash key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    lat: i64,
    lon: i64,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Common locations for defaults and tests
impl GeoLocation {
    /// Accra, Ghana
    #[must_use]
    pub const fn accra() -> Self {
        Self::new_unchecked(5.6037, -0.1870)
    }

    /// Kumasi, Ghana
    #[must_use]
    pub const fn kumasi() -> Self {
        Self::new_unchecked(6.6885, -1.6244)
    }
}

//! HTTP request handlers

pub mod discovery;
pub mod health;
pub mod location;
pub mod route;

use domain::value_objects::GeoLocation;
use serde::Deserialize;

use crate::error::ApiError;

/// A coordinate as sent by map consumers
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CoordinateBody {
    /// Latitude (-90 to 90)
    pub latitude: f64,
    /// Longitude (-180 to 180)
    pub longitude: f64,
}

impl CoordinateBody {
    /// Validate into a [`GeoLocation`]
    pub fn to_location(self) -> Result<GeoLocation, ApiError> {
        GeoLocation::new(self.latitude, self.longitude).map_err(|_| {
            ApiError::BadRequest(
                "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
                    .to_string(),
            )
        })
    }
}

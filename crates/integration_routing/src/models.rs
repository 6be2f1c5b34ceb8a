//! OSRM route response models

use domain::value_objects::GeoLocation;
use serde::Deserialize;

use crate::error::RoutingError;

/// A decoded driving route
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRoute {
    /// Path from origin to destination
    pub path: Vec<GeoLocation>,
    /// Driving distance in meters
    pub distance_meters: f64,
    /// Expected driving time in seconds
    pub duration_seconds: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    geometry: Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

/// GeoJSON LineString; positions are `[lon, lat]`
#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

/// Parse an OSRM `route` response with GeoJSON geometry
///
/// # Errors
///
/// Returns [`RoutingError::ParseError`] for malformed bodies or
/// coordinates, and [`RoutingError::NoRoute`] when the service reports a
/// non-`Ok` code, returns no routes, or returns an empty geometry.
pub fn parse_route(body: &str) -> Result<DrivingRoute, RoutingError> {
    let response: RouteResponse =
        serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

    if response.code != "Ok" {
        let detail = response
            .message
            .map_or_else(|| response.code.clone(), |m| format!("{}: {m}", response.code));
        return Err(RoutingError::NoRoute(detail));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::NoRoute("response contained no routes".to_string()))?;

    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|[lon, lat]| {
            GeoLocation::new(*lat, *lon).map_err(|e| RoutingError::ParseError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if path.is_empty() {
        return Err(RoutingError::NoRoute("empty geometry".to_string()));
    }

    Ok(DrivingRoute {
        path,
        distance_meters: route.distance,
        duration_seconds: route.duration,
    })
}

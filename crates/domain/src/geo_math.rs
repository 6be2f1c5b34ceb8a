//! Spherical distance and bearing math
//!
//! Pure functions over [`GeoLocation`] using a spherical Earth model.

use crate::value_objects::GeoLocation;

/// Mean Earth radius in meters used by the Haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two locations in meters (Haversine)
#[must_use]
pub fn distance_meters(a: &GeoLocation, b: &GeoLocation) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    )
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial bearing (forward azimuth) from `a` towards `b`
///
/// Returns degrees clockwise from true north in `[0, 360)`. The bearing of a
/// location to itself is `0`.
#[must_use]
pub fn initial_bearing_degrees(a: &GeoLocation, b: &GeoLocation) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1
        .cos()
        .mul_add(lat2.sin(), -(lat1.sin() * lat2.cos() * delta_lon.cos()));

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can yield exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Human-readable distance
///
/// Below one kilometer the value is rounded to whole meters (`"500 m"`),
/// otherwise it is shown in kilometers with one decimal (`"1.2 km"`).
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round())
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> GeoLocation {
        GeoLocation::new(lat, lon).expect("valid test coordinates")
    }

    #[test]
    fn distance_same_point_is_zero() {
        let a = GeoLocation::accra();
        assert!(distance_meters(&a, &a).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_one_degree_latitude() {
        let d = distance_meters(&loc(0.0, 0.0), &loc(1.0, 0.0));
        // 2 * pi * R / 360
        assert!((d - 111_194.93).abs() < 1.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoLocation::accra();
        let b = GeoLocation::kumasi();
        assert!((distance_meters(&a, &b) - distance_meters(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn format_below_one_kilometer() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(499.6), "500 m");
        assert_eq!(format_distance(999.0), "999 m");
    }

    #[test]
    fn format_kilometers() {
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(1500.0), "1.5 km");
        assert_eq!(format_distance(12_345.0), "12.3 km");
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = loc(0.0, 0.0);
        assert!(initial_bearing_degrees(&origin, &loc(1.0, 0.0)).abs() < 1e-9);
        assert!((initial_bearing_degrees(&origin, &loc(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_degrees(&origin, &loc(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing_degrees(&origin, &loc(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_to_self_is_zero() {
        let a = GeoLocation::accra();
        assert!(initial_bearing_degrees(&a, &a).abs() < f64::EPSILON);
    }
}

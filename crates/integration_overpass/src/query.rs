//! Overpass QL query builder

use std::fmt;

use domain::value_objects::GeoLocation;

/// Tag filters selecting charitable and religious features
///
/// Each entry is `(element selector, tag filter)`.
const FILTERS: &[(&str, &str)] = &[
    ("nwr", r#"["amenity"="place_of_worship"]"#),
    ("nwr", r#"["office"="ngo"]"#),
    ("node", r#"["amenity"="social_facility"]"#),
    ("node", r#"["office"="foundation"]"#),
    ("node", r#"["charity"="yes"]"#),
    ("node", r#"["social_facility"~"^(orphanage|group_home|shelter)$"]"#),
];

/// A radius search around a center point
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    /// Search center
    pub center: GeoLocation,
    /// Search radius in meters
    pub radius_meters: u32,
    /// Maximum number of elements to return
    pub max_results: u32,
    /// Server-side timeout in seconds
    pub server_timeout_secs: u64,
}

impl OverpassQuery {
    /// Create a query with the default limits (80 results, 25 s server timeout)
    #[must_use]
    pub const fn new(center: GeoLocation, radius_meters: u32) -> Self {
        Self {
            center,
            radius_meters,
            max_results: 80,
            server_timeout_secs: 25,
        }
    }

    /// Set the maximum number of results
    #[must_use]
    pub const fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    /// Set the server-side timeout
    #[must_use]
    pub const fn with_server_timeout(mut self, secs: u64) -> Self {
        self.server_timeout_secs = secs;
        self
    }

    /// Render the Overpass QL text
    ///
    /// Ways and relations are returned with their computed centroid
    /// (`out center`).
    #[must_use]
    pub fn to_ql(&self) -> String {
        let around = format!(
            "(around:{},{},{})",
            self.radius_meters,
            self.center.latitude(),
            self.center.longitude()
        );

        let mut ql = format!("[out:json][timeout:{}];\n(\n", self.server_timeout_secs);
        for (selector, filter) in FILTERS {
            ql.push_str(&format!("  {selector}{filter}{around};\n"));
        }
        ql.push_str(&format!(");\nout center {};", self.max_results));
        ql
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ql())
    }
}

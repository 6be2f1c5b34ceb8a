//! Discovery, location and classifier settings.

use std::time::Duration;

use application::{
    DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MIN_INTERVAL, DEFAULT_ROUTE_TIMEOUT, DiscoveryConfig,
    KeywordAdditions, KeywordTable, PositionRequest,
};
use domain::value_objects::GeoLocation;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Discovery cycle tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryAppConfig {
    /// Search radius in meters when the caller gives none
    #[serde(default = "default_radius")]
    pub default_radius_m: u32,

    /// Window in which a repeated search of the same area is ignored
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum spacing between outbound reverse-geocoding calls
    #[serde(default = "default_geocode_interval_ms")]
    pub geocode_min_interval_ms: u64,

    /// Upper bound for one reverse-geocoding lookup
    #[serde(default = "default_geocode_timeout_ms")]
    pub geocode_timeout_ms: u64,

    /// Upper bound for one routing request
    #[serde(default = "default_route_timeout_secs")]
    pub route_timeout_secs: u64,
}

const fn default_radius() -> u32 {
    5000
}

const fn default_debounce_ms() -> u64 {
    1000
}

const fn default_geocode_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL.as_millis() as u64
}

const fn default_geocode_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64
}

const fn default_route_timeout_secs() -> u64 {
    DEFAULT_ROUTE_TIMEOUT.as_secs()
}

impl Default for DiscoveryAppConfig {
    fn default() -> Self {
        Self {
            default_radius_m: default_radius(),
            debounce_ms: default_debounce_ms(),
            geocode_min_interval_ms: default_geocode_interval_ms(),
            geocode_timeout_ms: default_geocode_timeout_ms(),
            route_timeout_secs: default_route_timeout_secs(),
        }
    }
}

impl DiscoveryAppConfig {
    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.default_radius_m == 0 {
            return Err("discovery.default_radius_m must be greater than 0".to_string());
        }
        if self.geocode_timeout_ms == 0 || self.route_timeout_secs == 0 {
            return Err("discovery timeouts must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Minimum spacing between reverse-geocoding calls
    pub const fn geocode_min_interval(&self) -> Duration {
        Duration::from_millis(self.geocode_min_interval_ms)
    }

    /// Reverse-geocoding lookup bound
    pub const fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    /// Routing request bound
    pub const fn route_timeout(&self) -> Duration {
        Duration::from_secs(self.route_timeout_secs)
    }

    /// Coordinator settings, combined with the location request options
    pub fn to_discovery_config(&self, location: &LocationAppConfig) -> DiscoveryConfig {
        DiscoveryConfig {
            default_radius_m: self.default_radius_m,
            debounce: Duration::from_millis(self.debounce_ms),
            position_request: location.position_request(),
        }
    }
}

/// A fixed host position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPosition {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Accuracy radius in meters
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

/// Host location service settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationAppConfig {
    /// Ask for a GPS-grade fix
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Position request timeout in seconds
    #[serde(default = "default_location_timeout")]
    pub timeout_secs: u64,

    /// Accept a cached fix this old, in seconds
    #[serde(default = "default_maximum_age")]
    pub maximum_age_secs: u64,

    /// Position reported by the host; unset means unavailable
    #[serde(default)]
    pub fixed: Option<FixedPosition>,
}

const fn default_location_timeout() -> u64 {
    10
}

const fn default_maximum_age() -> u64 {
    60
}

impl Default for LocationAppConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: default_location_timeout(),
            maximum_age_secs: default_maximum_age(),
            fixed: None,
        }
    }
}

impl LocationAppConfig {
    /// Options for a host position request
    pub const fn position_request(&self) -> PositionRequest {
        PositionRequest {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_secs),
            maximum_age: Duration::from_secs(self.maximum_age_secs),
        }
    }

    /// The configured fixed position, validated
    pub fn fixed_location(&self) -> Result<Option<GeoLocation>, String> {
        self.fixed
            .map(|p| {
                GeoLocation::new(p.latitude, p.longitude)
                    .map_err(|e| format!("location.fixed: {e}"))
            })
            .transpose()
    }
}

/// Classifier keyword configuration
///
/// Lists given under `keywords` replace the built-in list of the same name,
/// lists under `additions` are appended to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierAppConfig {
    /// Replacement keyword lists
    #[serde(default)]
    pub keywords: KeywordTable,

    /// Extra keywords appended to the lists
    #[serde(default)]
    pub additions: KeywordAdditions,
}

impl ClassifierAppConfig {
    /// Effective keyword table
    pub fn table(&self) -> KeywordTable {
        self.keywords.clone().extended(&self.additions)
    }
}

//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `discovery`: Discovery tuning, host location, classifier keywords
//!
//! The integration sections reuse the configuration types of the
//! integration crates directly.

mod discovery;
mod server;

use std::fmt;
use std::path::Path;

use integration_geocoding::NominatimConfig;
use integration_overpass::OverpassConfig;
use integration_routing::RoutingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use discovery::{ClassifierAppConfig, DiscoveryAppConfig, FixedPosition, LocationAppConfig};
pub use server::ServerConfig;

/// Environment variable prefix, e.g. `GIVINGZONE_SERVER__PORT`
pub const ENV_PREFIX: &str = "GIVINGZONE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range
    #[error("Invalid configuration in [{section}]: {message}")]
    Invalid {
        /// Offending section
        section: &'static str,
        /// What is wrong
        message: String,
    },
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - verbose errors
    #[default]
    Development,
    /// Production environment - sanitized errors
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Discovery cycle tuning
    #[serde(default)]
    pub discovery: DiscoveryAppConfig,

    /// Overpass mirror pool
    #[serde(default)]
    pub overpass: OverpassConfig,

    /// Reverse geocoding service
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Driving route service
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Host location service
    #[serde(default)]
    pub location: LocationAppConfig,

    /// Classifier keywords
    #[serde(default)]
    pub classifier: ClassifierAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required when given) and
    /// the environment
    ///
    /// Sources in increasing priority: built-in defaults, the file,
    /// `GIVINGZONE_*` environment variables with `__` as section separator.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.discovery.validate().map_err(invalid("discovery"))?;
        self.overpass.validate().map_err(invalid("overpass"))?;
        self.geocoding.validate().map_err(invalid("geocoding"))?;
        self.routing.validate().map_err(invalid("routing"))?;
        self.location
            .fixed_location()
            .map(|_| ())
            .map_err(invalid("location"))?;
        Ok(())
    }

    /// Whether error details may be shown to clients
    pub const fn expose_error_details(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

fn invalid(section: &'static str) -> impl FnOnce(String) -> ConfigError {
    move |message| ConfigError::Invalid { section, message }
}

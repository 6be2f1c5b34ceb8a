//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports over the Overpass, Nominatim and OSRM
//! integration crates, and provides configuration loading, logging setup
//! and service wiring.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use config::{
    AppConfig, ClassifierAppConfig, ConfigError, DiscoveryAppConfig, ENV_PREFIX, Environment,
    FixedPosition, LocationAppConfig, ServerConfig,
};
pub use telemetry::{LogFormat, TelemetryError, init_logging};
pub use wiring::{AppServices, assemble, build_services};

//! Overpass client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Overpass place search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Interpreter endpoints, tried in order
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,

    /// Per-mirror request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of elements requested from the server
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Server-side query timeout embedded in the query (`[timeout:N]`)
    #[serde(default = "default_server_timeout_secs")]
    pub server_timeout_secs: u64,
}

fn default_mirrors() -> Vec<String> {
    vec![
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://overpass.kumi.systems/api/interpreter".to_string(),
        "https://overpass.private.coffee/api/interpreter".to_string(),
        "https://maps.mail.ru/osm/tools/overpass/api/interpreter".to_string(),
    ]
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_results() -> u32 {
    80
}

const fn default_server_timeout_secs() -> u64 {
    25
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            mirrors: default_mirrors(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            server_timeout_secs: default_server_timeout_secs(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration pointing at the given mirrors, suitable for testing
    #[must_use]
    pub fn for_testing(mirrors: Vec<String>) -> Self {
        Self {
            mirrors,
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.mirrors.is_empty() {
            return Err("at least one Overpass mirror is required".to_string());
        }

        if self.mirrors.iter().any(|m| m.trim().is_empty()) {
            return Err("mirror URLs must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }

        Ok(())
    }
}

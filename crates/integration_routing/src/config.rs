//! OSRM client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the driving route service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the OSRM server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// OSRM routing profile
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_profile() -> String {
    "driving".to_string()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            profile: default_profile(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration pointing at a test server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 1,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.base_url).map_err(|e| format!("invalid base_url: {e}"))?;

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.profile.trim().is_empty() {
            return Err("profile must not be empty".to_string());
        }

        Ok(())
    }
}

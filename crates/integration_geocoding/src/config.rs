//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim reverse geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Detail level of the reverse lookup (14 = suburb)
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Preferred label languages, sent as `accept-language`
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    4
}

const fn default_zoom() -> u8 {
    14
}

fn default_accept_language() -> String {
    "en".to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            zoom: default_zoom(),
            accept_language: default_accept_language(),
        }
    }
}

impl NominatimConfig {
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
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.zoom > 18 {
            return Err("zoom must be between 0 and 18".to_string());
        }

        Ok(())
    }
}

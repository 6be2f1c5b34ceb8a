//! Nominatim reverse geocoding client

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::models::ReverseResult;

/// Trait for reverse geocoding clients
#[async_trait]
pub trait ReverseGeocodingClient: Send + Sync {
    /// Resolve a coordinate to a short area label
    async fn reverse(
        &self,
        location: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<String, GeocodingError>;
}

/// Nominatim-based reverse geocoding client
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    config: NominatimConfig,
}

impl NominatimClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        config
            .validate()
            .map_err(GeocodingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("GivingZone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn fetch(&self, location: GeoLocation) -> Result<String, GeocodingError> {
        let url = format!("{}/reverse", self.config.base_url.trim_end_matches('/'));
        let params = [
            ("lat", location.latitude().to_string()),
            ("lon", location.longitude().to_string()),
            ("zoom", self.config.zoom.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let result: ReverseResult = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeocodingError::Timeout
            } else {
                GeocodingError::ParseError(e.to_string())
            }
        })?;

        result
            .label()
            .ok_or_else(|| GeocodingError::NotFound(location.to_string()))
    }
}

#[async_trait]
impl ReverseGeocodingClient for NominatimClient {
    #[instrument(skip_all, fields(location = %location))]
    async fn reverse(
        &self,
        location: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<String, GeocodingError> {
        debug!("Reverse geocoding");

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(GeocodingError::Cancelled),
            result = self.fetch(location) => result,
        }
    }
}

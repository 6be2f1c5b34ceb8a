//! Overpass client with sequential mirror failover

use std::time::Duration;

use async_trait::async_trait;
use domain::entities::RawElement;
use domain::value_objects::GeoLocation;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::OverpassConfig;
use crate::error::OverpassError;
use crate::models::parse_response;
use crate::query::OverpassQuery;

/// Trait for place search clients
#[async_trait]
pub trait PlaceSearchClient: Send + Sync {
    /// Find charitable and religious features within `radius_meters` of `center`
    async fn search(
        &self,
        center: GeoLocation,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawElement>, OverpassError>;
}

/// Overpass API client
///
/// Mirrors are tried strictly one after the other. The first mirror that
/// returns a parseable answer wins; later mirrors are never contacted.
#[derive(Debug)]
pub struct OverpassClient {
    client: Client,
    config: OverpassConfig,
}

impl OverpassClient {
    /// Create a new Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &OverpassConfig) -> Result<Self, OverpassError> {
        config
            .validate()
            .map_err(OverpassError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("GivingZone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OverpassError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Configured mirrors in failover order
    #[must_use]
    pub fn mirrors(&self) -> &[String] {
        &self.config.mirrors
    }

    fn build_query(&self, center: GeoLocation, radius_meters: u32) -> String {
        OverpassQuery::new(center, radius_meters)
            .with_max_results(self.config.max_results)
            .with_server_timeout(self.config.server_timeout_secs)
            .to_ql()
    }

    /// Send the query to one mirror
    async fn query_mirror(&self, mirror: &str, ql: &str) -> Result<Vec<RawElement>, OverpassError> {
        let response = self
            .client
            .post(mirror)
            .form(&[("data", ql)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OverpassError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    OverpassError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OverpassError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(OverpassError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                OverpassError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                OverpassError::ParseError(e.to_string())
            }
        })?;

        parse_response(&body)
    }
}

#[async_trait]
impl PlaceSearchClient for OverpassClient {
    #[instrument(skip_all, fields(center = %center, radius_meters = radius_meters))]
    async fn search(
        &self,
        center: GeoLocation,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawElement>, OverpassError> {
        let ql = self.build_query(center, radius_meters);
        let mut attempts = 0;
        let mut last_error: Option<OverpassError> = None;

        for mirror in &self.config.mirrors {
            if cancel.is_cancelled() {
                return Err(OverpassError::Cancelled);
            }

            attempts += 1;
            debug!(%mirror, attempt = attempts, "Querying Overpass mirror");

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(OverpassError::Cancelled),
                result = self.query_mirror(mirror, &ql) => result,
            };

            match result {
                Ok(elements) => {
                    info!(%mirror, attempt = attempts, count = elements.len(), "Overpass mirror answered");
                    return Ok(elements);
                },
                Err(e) => {
                    warn!(%mirror, attempt = attempts, error = %e, "Overpass mirror failed, trying next");
                    last_error = Some(e);
                },
            }
        }

        Err(OverpassError::AllMirrorsFailed {
            attempts,
            last_error: last_error.map_or_else(|| "no mirror answered".to_string(), |e| e.to_string()),
        })
    }
}

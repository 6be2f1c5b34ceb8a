//! OSRM HTTP client

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{DrivingRoute, parse_route};

/// Trait for driving route clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Request a driving route between two points
    async fn driving_route(
        &self,
        from: GeoLocation,
        to: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<DrivingRoute, RoutingError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmClient {
    client: Client,
    config: RoutingConfig,
}

impl OsrmClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        config
            .validate()
            .map_err(RoutingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("GivingZone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// `{base}/route/v1/{profile}/{fromLon},{fromLat};{toLon},{toLat}`
    fn route_url(&self, from: GeoLocation, to: GeoLocation) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }

    fn map_transport_error(&self, e: &reqwest::Error) -> RoutingError {
        if e.is_timeout() {
            RoutingError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RoutingError::ConnectionFailed(e.to_string())
        }
    }

    async fn fetch(&self, from: GeoLocation, to: GeoLocation) -> Result<DrivingRoute, RoutingError> {
        let url = self.route_url(from, to);
        debug!(%url, "Requesting driving route");

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        // OSRM answers NoRoute and friends with 400 and a JSON code
        if !status.is_success() {
            return match parse_route(&body) {
                Err(RoutingError::NoRoute(detail)) => Err(RoutingError::NoRoute(detail)),
                _ => Err(RoutingError::RequestFailed(format!("HTTP {status}"))),
            };
        }

        parse_route(&body)
    }
}

#[async_trait]
impl RoutingClient for OsrmClient {
    #[instrument(skip_all, fields(from = %from, to = %to))]
    async fn driving_route(
        &self,
        from: GeoLocation,
        to: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<DrivingRoute, RoutingError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(RoutingError::Cancelled),
            result = self.fetch(from, to) => result,
        }
    }
}

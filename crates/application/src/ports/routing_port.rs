//! Driving route port

use async_trait::async_trait;
use domain::entities::RouteSummary;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::error::ApplicationError;

/// A decoded path as returned by the routing service
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    /// Ordered coordinates from origin to destination
    pub path: Vec<GeoLocation>,
    /// Distance and duration when reported
    pub summary: Option<RouteSummary>,
}

/// Port for driving route lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Request a driving path between two points
    async fn driving_route(
        &self,
        from: GeoLocation,
        to: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<RoutedPath, ApplicationError>;
}

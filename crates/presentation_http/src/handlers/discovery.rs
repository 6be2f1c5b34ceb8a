//! Discovery handlers

use application::{DiscoverySnapshot, OrgFilter};
use axum::{
    Json,
    extract::{Query, State},
};
use domain::entities::MapMarker;
use serde::Deserialize;
use tracing::instrument;

use super::CoordinateBody;
use crate::{error::ApiError, state::AppState};

/// Request body for "search this area"
#[derive(Debug, Deserialize)]
pub struct SearchAreaRequest {
    /// Viewport center
    #[serde(flatten)]
    pub center: CoordinateBody,
    /// Search radius in meters, defaults to the configured radius
    #[serde(default)]
    pub radius_m: Option<u32>,
}

/// Search around the viewport center
///
/// POST /v1/search-area
#[instrument(skip_all)]
pub async fn search_area(
    State(state): State<AppState>,
    Json(request): Json<SearchAreaRequest>,
) -> Result<Json<DiscoverySnapshot>, ApiError> {
    let center = request.center.to_location()?;
    let snapshot = state
        .coordinator
        .search_this_area(center, request.radius_m)
        .await?;
    Ok(Json(snapshot))
}

/// Repeat the last search
///
/// POST /v1/discovery/refresh
pub async fn refresh(State(state): State<AppState>) -> Result<Json<DiscoverySnapshot>, ApiError> {
    Ok(Json(state.coordinator.refresh().await?))
}

/// Current snapshot, organizations and markers filtered
///
/// GET /v1/discovery?category=health&giving_type=zakat&verified_only=true
pub async fn get_discovery(
    State(state): State<AppState>,
    Query(filter): Query<OrgFilter>,
) -> Json<DiscoverySnapshot> {
    let mut snapshot = state.coordinator.snapshot();
    snapshot.organizations.retain(|o| filter.matches(o));
    snapshot.markers = snapshot
        .organizations
        .iter()
        .map(domain::Organization::to_marker)
        .collect();
    Json(snapshot)
}

/// Markers for the current snapshot
///
/// GET /v1/markers
pub async fn get_markers(
    State(state): State<AppState>,
    Query(filter): Query<OrgFilter>,
) -> Json<Vec<MapMarker>> {
    Json(state.coordinator.markers(&filter))
}

//! Directions handlers

use application::DiscoverySnapshot;
use axum::{Json, extract::State};
use domain::entities::RouteResult;
use serde::Deserialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Request body for directions
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Destination organization
    pub organization_id: i64,
}

/// Driving directions from the user's position to an organization
///
/// POST /v1/route
#[instrument(skip(state))]
pub async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResult>, ApiError> {
    let route = state
        .coordinator
        .directions_to(request.organization_id)
        .await?;
    Ok(Json(route))
}

/// Cancel and clear the active route
///
/// DELETE /v1/route
pub async fn clear_route(State(state): State<AppState>) -> Json<DiscoverySnapshot> {
    Json(state.coordinator.clear_route())
}

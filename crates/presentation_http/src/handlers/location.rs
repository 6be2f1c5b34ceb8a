//! Location event handlers
//!
//! The map consumer owns the device geolocation and reports its outcome
//! here. `POST /v1/location/request` asks the server-side location service
//! instead.

use application::DiscoverySnapshot;
use axum::{Json, extract::State};
use tracing::{info, instrument};

use super::CoordinateBody;
use crate::{error::ApiError, state::AppState};

/// A position was resolved; discover around it
///
/// POST /v1/location
#[instrument(skip_all)]
pub async fn location_resolved(
    State(state): State<AppState>,
    Json(body): Json<CoordinateBody>,
) -> Result<Json<DiscoverySnapshot>, ApiError> {
    let location = body.to_location()?;
    info!(%location, "Location resolved");
    let snapshot = state.coordinator.on_location_resolved(location).await?;
    Ok(Json(snapshot))
}

/// The user refused location access
///
/// POST /v1/location/denied
pub async fn location_denied(
    State(state): State<AppState>,
) -> Result<Json<DiscoverySnapshot>, ApiError> {
    Ok(Json(state.coordinator.on_permission_denied()?))
}

/// The platform could not produce a position
///
/// POST /v1/location/unavailable
pub async fn location_unavailable(
    State(state): State<AppState>,
) -> Result<Json<DiscoverySnapshot>, ApiError> {
    Ok(Json(state.coordinator.on_location_unavailable()?))
}

/// Ask the host location service, then discover
///
/// POST /v1/location/request
#[instrument(skip_all)]
pub async fn request_location(
    State(state): State<AppState>,
) -> Result<Json<DiscoverySnapshot>, ApiError> {
    Ok(Json(state.coordinator.request_location().await?))
}

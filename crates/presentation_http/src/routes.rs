//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health::health_check))
        // Location events (v1)
        .route("/v1/location", post(handlers::location::location_resolved))
        .route("/v1/location/denied", post(handlers::location::location_denied))
        .route(
            "/v1/location/unavailable",
            post(handlers::location::location_unavailable),
        )
        .route("/v1/location/request", post(handlers::location::request_location))
        // Discovery (v1)
        .route("/v1/search-area", post(handlers::discovery::search_area))
        .route("/v1/discovery", get(handlers::discovery::get_discovery))
        .route("/v1/discovery/refresh", post(handlers::discovery::refresh))
        .route("/v1/markers", get(handlers::discovery::get_markers))
        // Directions (v1)
        .route(
            "/v1/route",
            post(handlers::route::create_route).delete(handlers::route::clear_route),
        )
        .with_state(state)
}

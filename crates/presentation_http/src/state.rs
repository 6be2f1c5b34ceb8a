//! Application state shared across handlers

use std::sync::Arc;

use application::DiscoveryCoordinator;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Discovery orchestration
    pub coordinator: Arc<DiscoveryCoordinator>,
}

impl AppState {
    /// Create state around a coordinator
    pub const fn new(coordinator: Arc<DiscoveryCoordinator>) -> Self {
        Self { coordinator }
    }
}

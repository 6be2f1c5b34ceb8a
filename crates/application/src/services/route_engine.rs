//! Route engine
//!
//! Computes driving routes with graceful degradation: when the routing
//! service fails, the caller still gets a [`RouteResult`] whose viewport
//! frames both endpoints.
//!
//! Successful routes are memoised per (from, to) pair for the session and
//! concurrent identical requests share one outbound call. Only one route is
//! active at a time; clearing or superseding it discards any late answer.

use std::sync::Arc;
use std::time::Duration;

use domain::entities::RouteResult;
use domain::value_objects::{GeoLocation, GridKey};
use moka::future::Cache;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::RoutingPort;

/// Upper bound for one routing call
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Route endpoints are keyed at about one meter resolution
const ROUTE_KEY_DECIMALS: u32 = 5;

const CACHE_CAPACITY: u64 = 256;

/// Memoisation key for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteKey {
    from: GridKey,
    to: GridKey,
}

impl RouteKey {
    /// Key for a (from, to) pair
    pub fn new(from: &GeoLocation, to: &GeoLocation) -> Self {
        Self {
            from: from.grid_key(ROUTE_KEY_DECIMALS),
            to: to.grid_key(ROUTE_KEY_DECIMALS),
        }
    }
}

#[derive(Debug)]
struct ActiveRoute {
    key: RouteKey,
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct RouteState {
    active: Option<ActiveRoute>,
    generation: u64,
}

/// Driving route engine
pub struct RouteEngine {
    port: Arc<dyn RoutingPort>,
    cache: Cache<RouteKey, RouteResult>,
    state: Mutex<RouteState>,
    timeout: Duration,
}

impl std::fmt::Debug for RouteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEngine")
            .field("memoised_routes", &self.cache.entry_count())
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RouteEngine {
    /// Create a route engine over a routing port
    pub fn new(port: Arc<dyn RoutingPort>) -> Self {
        Self {
            port,
            cache: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
            state: Mutex::new(RouteState::default()),
            timeout: DEFAULT_ROUTE_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Compute a route from `from` to `to`
    ///
    /// Routing failures degrade to an endpoints-only result. Returns
    /// [`ApplicationError::Cancelled`] if the route was cleared or superseded
    /// before the answer arrived.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn route(
        &self,
        from: GeoLocation,
        to: GeoLocation,
    ) -> Result<RouteResult, ApplicationError> {
        let key = RouteKey::new(&from, &to);
        let (generation, cancel) = self.activate(key);

        let mut outcome = self.fetch_shared(key, from, to, &cancel).await;

        // Joined an in-flight fetch that belonged to a cleared request
        if is_cancelled(&outcome) && self.is_current(generation, &cancel) {
            debug!("Shared fetch was cancelled by a cleared route, fetching again");
            outcome = self.fetch_shared(key, from, to, &cancel).await;
        }

        if !self.is_current(generation, &cancel) {
            debug!("Discarding result for cleared or superseded route");
            return Err(ApplicationError::Cancelled);
        }

        match outcome {
            Ok(route) => {
                info!(points = route.path.len(), "Route ready");
                Ok(route)
            },
            Err(e) if matches!(*e, ApplicationError::Cancelled) => Err(ApplicationError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Routing failed, framing endpoints only");
                Ok(RouteResult::endpoints_only(from, to))
            },
        }
    }

    /// Cancel the active route request, if any
    ///
    /// Returns true when a route was active.
    pub fn clear_route(&self) -> bool {
        let mut state = self.state.lock();
        state.active.take().is_some_and(|active| {
            active.cancel.cancel();
            debug!(generation = active.generation, "Route cleared");
            true
        })
    }

    /// Whether a route is currently active
    pub fn has_active_route(&self) -> bool {
        self.state.lock().active.is_some()
    }

    /// Whether the route for `key` is active and not cleared
    pub fn is_active(&self, key: RouteKey) -> bool {
        self.state
            .lock()
            .active
            .as_ref()
            .is_some_and(|a| a.key == key && !a.cancel.is_cancelled())
    }

    /// Memoised fetch; concurrent callers for the same key share one call
    async fn fetch_shared(
        &self,
        key: RouteKey,
        from: GeoLocation,
        to: GeoLocation,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, Arc<ApplicationError>> {
        self.cache
            .try_get_with(
                key,
                fetch_route(Arc::clone(&self.port), from, to, self.timeout, cancel.clone()),
            )
            .await
    }

    /// Make `key` the active route, reusing the in-flight token for the same key
    fn activate(&self, key: RouteKey) -> (u64, CancellationToken) {
        let mut state = self.state.lock();

        if let Some(active) = state.active.as_ref() {
            if active.key == key && !active.cancel.is_cancelled() {
                return (active.generation, active.cancel.clone());
            }
            active.cancel.cancel();
        }

        state.generation += 1;
        let cancel = CancellationToken::new();
        state.active = Some(ActiveRoute {
            key,
            generation: state.generation,
            cancel: cancel.clone(),
        });
        (state.generation, cancel)
    }

    fn is_current(&self, generation: u64, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        self.state
            .lock()
            .active
            .as_ref()
            .is_some_and(|a| a.generation == generation)
    }
}

fn is_cancelled(outcome: &Result<RouteResult, Arc<ApplicationError>>) -> bool {
    matches!(outcome, Err(e) if matches!(**e, ApplicationError::Cancelled))
}

/// One outbound call; empty geometry counts as a failure so it is not memoised
async fn fetch_route(
    port: Arc<dyn RoutingPort>,
    from: GeoLocation,
    to: GeoLocation,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<RouteResult, ApplicationError> {
    debug!("Requesting driving route");

    let routed = tokio::time::timeout(timeout, port.driving_route(from, to, &cancel))
        .await
        .map_err(|_| {
            ApplicationError::RoutingFailed(format!("timed out after {}s", timeout.as_secs()))
        })??;

    if routed.path.is_empty() {
        return Err(ApplicationError::RoutingFailed("empty geometry".to_string()));
    }

    Ok(RouteResult::with_path(from, to, routed.path, routed.summary))
}

//! Reverse geocoder service
//!
//! Resolves a coordinate to an area label for display. The lookup never
//! fails its caller: timeouts and service errors produce
//! [`FALLBACK_LABEL`], and calls that arrive while the [`GeocodeGate`] is
//! closed get the previously delivered label back without blocking.

use std::sync::Arc;
use std::time::Duration;

use domain::value_objects::{GeoLocation, GridKey};
use moka::future::Cache;
use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::ReverseGeocodingPort;

/// Label used when no place name could be obtained
pub const FALLBACK_LABEL: &str = "Area Detected";

/// Minimum spacing between outbound lookups
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1600);

/// Upper bound for one outbound lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);

/// Cache keys round coordinates to this many decimals (about 110 m)
const CACHE_KEY_DECIMALS: u32 = 3;

const CACHE_CAPACITY: u64 = 1024;

#[derive(Debug)]
struct GateState {
    last_call: Option<Instant>,
    last_label: String,
}

/// Rate gate for outbound geocoding calls
///
/// Every geocoder built from the same gate shares one outbound window.
#[derive(Debug)]
pub struct GeocodeGate {
    min_interval: Duration,
    state: Mutex<GateState>,
}

impl GeocodeGate {
    /// Create a gate with the given minimum interval
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            state: Mutex::new(GateState {
                last_call: None,
                last_label: FALLBACK_LABEL.to_string(),
            }),
        }
    }

    /// Claim the outbound slot
    ///
    /// Returns the previous label instead when the window is still closed.
    pub fn try_acquire(&self) -> Result<(), String> {
        let mut state = self.state.lock();
        let now = Instant::now();

        if let Some(last) = state.last_call {
            if now.duration_since(last) < self.min_interval {
                return Err(state.last_label.clone());
            }
        }

        state.last_call = Some(now);
        Ok(())
    }

    /// Remember the label most recently delivered
    pub fn record(&self, label: &str) {
        self.state.lock().last_label = label.to_string();
    }

    /// The label most recently delivered
    pub fn last_label(&self) -> String {
        self.state.lock().last_label.clone()
    }

    /// Configured minimum interval
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Rate-gated, cached reverse geocoder
#[derive(Clone)]
pub struct ReverseGeocoder {
    port: Arc<dyn ReverseGeocodingPort>,
    gate: Arc<GeocodeGate>,
    cache: Cache<GridKey, String>,
    timeout: Duration,
}

impl std::fmt::Debug for ReverseGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverseGeocoder")
            .field("gate", &self.gate)
            .field("cached_entries", &self.cache.entry_count())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ReverseGeocoder {
    /// Create a geocoder that spaces its lookups through `gate`
    pub fn new(port: Arc<dyn ReverseGeocodingPort>, gate: Arc<GeocodeGate>) -> Self {
        Self {
            port,
            gate,
            cache: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the per-lookup timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a coordinate to a display label
    ///
    /// Cache hits skip the gate. A cancelled lookup returns the previous
    /// label and does not record anything.
    #[instrument(skip_all, fields(location = %location))]
    pub async fn resolve(&self, location: GeoLocation, cancel: &CancellationToken) -> String {
        let key = location.grid_key(CACHE_KEY_DECIMALS);

        if let Some(label) = self.cache.get(&key).await {
            debug!(%label, "Geocode cache hit");
            self.gate.record(&label);
            return label;
        }

        if let Err(previous) = self.gate.try_acquire() {
            debug!(%previous, "Geocode gate closed, keeping previous label");
            return previous;
        }

        let lookup = tokio::time::timeout(self.timeout, self.port.reverse(location, cancel));

        let label = tokio::select! {
            biased;
            () = cancel.cancelled() => return self.gate.last_label(),
            outcome = lookup => match outcome {
                Ok(Ok(label)) => {
                    self.cache.insert(key, label.clone()).await;
                    label
                },
                Ok(Err(e)) => {
                    if matches!(e, ApplicationError::Cancelled) {
                        return self.gate.last_label();
                    }
                    warn!(error = %e, "Reverse geocoding failed, using fallback label");
                    FALLBACK_LABEL.to_string()
                },
                Err(_) => {
                    warn!(timeout = ?self.timeout, "Reverse geocoding timed out, using fallback label");
                    FALLBACK_LABEL.to_string()
                },
            },
        };

        self.gate.record(&label);
        label
    }
}

//! Discovery coordinator
//!
//! Orchestrates one discovery cycle per location event: the area label and
//! the place search run concurrently, results are classified and sorted by
//! numeric distance, and a new [`DiscoverySnapshot`] is published on a watch
//! channel. A failed search publishes an empty list, never stale data.
//!
//! The coordinator also owns the [`LocationState`] machine, debounces
//! repeated searches of the same area and cancels superseded ones.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::entities::{GivingType, MapMarker, OrgCategory, Organization, RouteResult};
use domain::value_objects::{GeoLocation, GridKey, LocationEvent, LocationState};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocationError, LocationPort, PlaceDiscoveryPort, PositionRequest};
use crate::services::org_classifier::OrgClassifier;
use crate::services::reverse_geocoder::ReverseGeocoder;
use crate::services::route_engine::{RouteEngine, RouteKey};

/// Search centers are compared at about 11 m resolution for debouncing
const AREA_KEY_DECIMALS: u32 = 4;

/// Tunables for the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Radius used when the caller gives none
    pub default_radius_m: u32,
    /// Repeated searches of the same area inside this window are ignored
    pub debounce: Duration,
    /// Options passed to the host location service
    pub position_request: PositionRequest,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_radius_m: 5000,
            debounce: Duration::from_secs(1),
            position_request: PositionRequest::default(),
        }
    }
}

/// Progress of the current discovery cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DiscoveryStatus {
    /// Nothing searched yet
    #[default]
    Idle,
    /// A search is running
    Loading,
    /// Results are published
    Ready,
    /// The search failed; the list is empty
    Failed {
        /// Failure description
        message: String,
        /// Whether trying again may help
        retryable: bool,
    },
}

/// Everything a map consumer needs to render the current state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    /// Increases with every publish
    pub revision: u64,
    /// Time of the last publish
    pub updated_at: DateTime<Utc>,
    pub status: DiscoveryStatus,
    pub location_state: LocationState,
    /// Last known user position
    pub user_location: Option<GeoLocation>,
    /// Center of the last search
    pub search_center: Option<GeoLocation>,
    pub radius_meters: u32,
    /// Human-readable label of the search area
    pub area_label: Option<String>,
    /// Organizations sorted nearest first
    pub organizations: Vec<Organization>,
    pub markers: Vec<MapMarker>,
    /// Active route, if any
    pub route: Option<RouteResult>,
}

impl DiscoverySnapshot {
    fn initial(radius_meters: u32) -> Self {
        Self {
            revision: 0,
            updated_at: Utc::now(),
            status: DiscoveryStatus::Idle,
            location_state: LocationState::Idle,
            user_location: None,
            search_center: None,
            radius_meters,
            area_label: None,
            organizations: Vec::new(),
            markers: Vec::new(),
            route: None,
        }
    }
}

/// Filter over the published organization list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgFilter {
    /// Only this category
    #[serde(default)]
    pub category: Option<OrgCategory>,
    /// Only organizations accepting this giving type
    #[serde(default)]
    pub giving_type: Option<GivingType>,
    /// Only verified organizations
    #[serde(default)]
    pub verified_only: bool,
}

impl OrgFilter {
    /// Whether `org` passes the filter
    pub fn matches(&self, org: &Organization) -> bool {
        self.category.is_none_or(|c| org.category() == c)
            && self.giving_type.is_none_or(|g| org.accepts(g))
            && (!self.verified_only || org.is_verified())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AreaKey {
    center: GridKey,
    radius_meters: u32,
}

#[derive(Debug)]
struct RequestMark {
    key: AreaKey,
    at: Instant,
    generation: u64,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    location_state: LocationState,
    user_location: Option<GeoLocation>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    last_request: Option<RequestMark>,
}

/// Coordinates location events, discovery cycles and directions
pub struct DiscoveryCoordinator {
    places: Arc<dyn PlaceDiscoveryPort>,
    geocoder: ReverseGeocoder,
    classifier: OrgClassifier,
    routes: RouteEngine,
    location: Option<Arc<dyn LocationPort>>,
    config: DiscoveryConfig,
    state: Mutex<CoordinatorState>,
    snapshot_tx: watch::Sender<DiscoverySnapshot>,
}

impl std::fmt::Debug for DiscoveryCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryCoordinator")
            .field("geocoder", &self.geocoder)
            .field("routes", &self.routes)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DiscoveryCoordinator {
    /// Create a coordinator
    pub fn new(
        places: Arc<dyn PlaceDiscoveryPort>,
        geocoder: ReverseGeocoder,
        classifier: OrgClassifier,
        routes: RouteEngine,
        config: DiscoveryConfig,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(DiscoverySnapshot::initial(config.default_radius_m));
        Self {
            places,
            geocoder,
            classifier,
            routes,
            location: None,
            config,
            state: Mutex::new(CoordinatorState::default()),
            snapshot_tx,
        }
    }

    /// Attach the host location service used by [`Self::request_location`]
    #[must_use]
    pub fn with_location_port(mut self, port: Arc<dyn LocationPort>) -> Self {
        self.location = Some(port);
        self
    }

    /// Current snapshot
    pub fn snapshot(&self) -> DiscoverySnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receive every future snapshot
    pub fn subscribe(&self) -> watch::Receiver<DiscoverySnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current location state
    pub fn location_state(&self) -> LocationState {
        self.state.lock().location_state
    }

    /// Published organizations passing `filter`
    pub fn organizations(&self, filter: &OrgFilter) -> Vec<Organization> {
        self.snapshot_tx
            .borrow()
            .organizations
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect()
    }

    /// Markers for the published organizations passing `filter`
    pub fn markers(&self, filter: &OrgFilter) -> Vec<MapMarker> {
        self.organizations(filter)
            .iter()
            .map(Organization::to_marker)
            .collect()
    }

    /// Ask the host for a position, then discover around it
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::LocationDenied`] or
    /// [`ApplicationError::LocationUnavailable`] after publishing the
    /// matching state, or an invalid-transition error while a request is
    /// already running.
    #[instrument(skip(self))]
    pub async fn request_location(&self) -> Result<DiscoverySnapshot, ApplicationError> {
        self.transition(LocationEvent::Request)?;

        let Some(port) = self.location.clone() else {
            self.transition(LocationEvent::PlatformUnavailable)?;
            return Err(ApplicationError::LocationUnavailable(
                "no location service configured".to_string(),
            ));
        };

        match port.current_position(self.config.position_request).await {
            Ok(fix) => {
                debug!(accuracy_m = ?fix.accuracy_m, "Position fix received");
                self.on_location_resolved(fix.location).await
            },
            Err(LocationError::PermissionDenied) => {
                self.transition(LocationEvent::PermissionDenied)?;
                Err(ApplicationError::LocationDenied)
            },
            Err(LocationError::Unavailable(reason)) => {
                self.transition(LocationEvent::PlatformUnavailable)?;
                Err(ApplicationError::LocationUnavailable(reason))
            },
        }
    }

    /// The host reported a position; discover around it
    ///
    /// A fix that arrives without a pending request counts as one.
    #[instrument(skip(self), fields(location = %location))]
    pub async fn on_location_resolved(
        &self,
        location: GeoLocation,
    ) -> Result<DiscoverySnapshot, ApplicationError> {
        {
            let mut state = self.state.lock();
            let current = state.location_state;
            let locating = if current.is_locating() {
                current
            } else {
                current.apply(LocationEvent::Request)?
            };
            state.location_state = locating.apply(LocationEvent::Resolved)?;
            state.user_location = Some(location);
        }

        self.publish(|s| {
            s.location_state = LocationState::Resolved;
            s.user_location = Some(location);
        });

        self.discover(location, location, self.config.default_radius_m, false)
            .await
    }

    /// The user refused location access
    pub fn on_permission_denied(&self) -> Result<DiscoverySnapshot, ApplicationError> {
        self.transition(LocationEvent::PermissionDenied)?;
        Ok(self.snapshot())
    }

    /// The platform could not produce a position
    pub fn on_location_unavailable(&self) -> Result<DiscoverySnapshot, ApplicationError> {
        self.transition(LocationEvent::PlatformUnavailable)?;
        Ok(self.snapshot())
    }

    /// Search around a viewport center
    ///
    /// Distances are measured from the user's last known position when one
    /// exists, else from the viewport center.
    #[instrument(skip(self), fields(center = %center))]
    pub async fn search_this_area(
        &self,
        center: GeoLocation,
        radius_meters: Option<u32>,
    ) -> Result<DiscoverySnapshot, ApplicationError> {
        let radius = self.validate_radius(radius_meters)?;
        let origin = self.state.lock().user_location.unwrap_or(center);
        self.discover(center, origin, radius, false).await
    }

    /// Repeat the last search, bypassing the debounce window
    pub async fn refresh(&self) -> Result<DiscoverySnapshot, ApplicationError> {
        let snapshot = self.snapshot();
        let center = snapshot.search_center.ok_or_else(|| {
            ApplicationError::InvalidInput("nothing to refresh, no search has run".to_string())
        })?;
        let origin = self.state.lock().user_location.unwrap_or(center);
        self.discover(center, origin, snapshot.radius_meters, true)
            .await
    }

    /// Route from the user's last known position to an organization
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `InvalidInput` when no user
    /// position is known, and `Cancelled` when the route was cleared or
    /// superseded before it arrived.
    #[instrument(skip(self))]
    pub async fn directions_to(&self, org_id: i64) -> Result<RouteResult, ApplicationError> {
        let destination = self
            .snapshot_tx
            .borrow()
            .organizations
            .iter()
            .find(|o| o.id() == org_id)
            .map(Organization::location)
            .ok_or_else(|| ApplicationError::NotFound(format!("organization {org_id}")))?;

        let origin = self.state.lock().user_location.ok_or_else(|| {
            ApplicationError::InvalidInput("user position is not known yet".to_string())
        })?;

        let route = self.routes.route(origin, destination).await?;

        // A clear that lands after the engine answered must win
        let key = RouteKey::new(&origin, &destination);
        let published = self.snapshot_tx.send_if_modified(|s| {
            if !self.routes.is_active(key) {
                return false;
            }
            s.route = Some(route.clone());
            stamp(s);
            true
        });

        if !published {
            debug!("Route cleared before it could be published");
            return Err(ApplicationError::Cancelled);
        }
        Ok(route)
    }

    /// Cancel and forget the active route
    pub fn clear_route(&self) -> DiscoverySnapshot {
        self.routes.clear_route();
        self.publish(|s| s.route = None);
        self.snapshot()
    }

    fn validate_radius(&self, radius_meters: Option<u32>) -> Result<u32, ApplicationError> {
        match radius_meters {
            None => Ok(self.config.default_radius_m),
            Some(0) => Err(ApplicationError::InvalidInput(
                "radius must be greater than 0".to_string(),
            )),
            Some(r) => Ok(r),
        }
    }

    fn transition(&self, event: LocationEvent) -> Result<LocationState, ApplicationError> {
        let next = {
            let mut state = self.state.lock();
            let next = state.location_state.apply(event)?;
            state.location_state = next;
            next
        };
        debug!(%event, state = %next, "Location state changed");
        self.publish(|s| s.location_state = next);
        Ok(next)
    }

    fn publish(&self, update: impl FnOnce(&mut DiscoverySnapshot)) {
        self.snapshot_tx.send_modify(|s| {
            update(s);
            stamp(s);
        });
    }

    /// Wait until no cycle is loading; the outcome may be `Failed`
    async fn settled_snapshot(&self) -> Result<DiscoverySnapshot, ApplicationError> {
        let mut rx = self.snapshot_tx.subscribe();
        let settled = rx
            .wait_for(|s| s.status != DiscoveryStatus::Loading)
            .await
            .map_err(|_| ApplicationError::Internal("snapshot channel closed".to_string()))?;
        Ok((*settled).clone())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    /// Claim a new discovery cycle, or `None` when debounced
    fn begin_cycle(&self, key: AreaKey, force: bool) -> Option<(u64, CancellationToken)> {
        let mut state = self.state.lock();

        if !force {
            if let Some(mark) = state.last_request.as_ref() {
                if mark.key == key
                    && mark.generation == state.generation
                    && mark.at.elapsed() < self.config.debounce
                {
                    return None;
                }
            }
        }

        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }

        state.generation += 1;
        let cancel = CancellationToken::new();
        state.in_flight = Some(cancel.clone());
        state.last_request = Some(RequestMark {
            key,
            at: Instant::now(),
            generation: state.generation,
        });

        Some((state.generation, cancel))
    }

    fn finish_cycle(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.in_flight = None;
        }
    }

    async fn discover(
        &self,
        center: GeoLocation,
        origin: GeoLocation,
        radius_meters: u32,
        force: bool,
    ) -> Result<DiscoverySnapshot, ApplicationError> {
        let key = AreaKey {
            center: center.grid_key(AREA_KEY_DECIMALS),
            radius_meters,
        };

        let Some((generation, cancel)) = self.begin_cycle(key, force) else {
            debug!("Same area requested inside debounce window, joining the running cycle");
            return self.settled_snapshot().await;
        };

        self.publish(|s| {
            s.status = DiscoveryStatus::Loading;
            s.search_center = Some(center);
            s.radius_meters = radius_meters;
        });

        let (label, places) = tokio::join!(
            self.geocoder.resolve(center, &cancel),
            self.places.find_places(center, radius_meters, &cancel)
        );

        if !self.is_current(generation) {
            debug!("Discarding superseded discovery result");
            return Err(ApplicationError::Cancelled);
        }
        self.finish_cycle(generation);

        match places {
            Ok(elements) => {
                let organizations = self.classifier.classify_all(&elements, &origin);
                let markers = organizations.iter().map(Organization::to_marker).collect();
                info!(
                    raw = elements.len(),
                    organizations = organizations.len(),
                    area = %label,
                    "Discovery complete"
                );
                self.publish(|s| {
                    s.status = DiscoveryStatus::Ready;
                    s.area_label = Some(label);
                    s.organizations = organizations;
                    s.markers = markers;
                });
                Ok(self.snapshot())
            },
            Err(ApplicationError::Cancelled) => Err(ApplicationError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Discovery failed");
                let status = DiscoveryStatus::Failed {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                };
                self.publish(|s| {
                    s.status = status;
                    s.area_label = Some(label);
                    s.organizations.clear();
                    s.markers.clear();
                });
                Err(e)
            },
        }
    }
}

fn stamp(snapshot: &mut DiscoverySnapshot) {
    snapshot.revision += 1;
    snapshot.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use domain::entities::{ElementKind, RawElement, RouteSummary, ViewportFit};

    use super::*;
    use crate::ports::{
        MockLocationPort, MockPlaceDiscoveryPort, MockReverseGeocodingPort, MockRoutingPort,
        PositionFix, ReverseGeocodingPort, RoutedPath, RoutingPort,
    };
    use crate::services::reverse_geocoder::{DEFAULT_MIN_INTERVAL, GeocodeGate};

    fn element(id: i64, lat: f64, lon: f64) -> RawElement {
        RawElement::new(ElementKind::Node, id, Some(GeoLocation::new(lat, lon).unwrap()))
    }

    fn accra_elements() -> Vec<RawElement> {
        vec![
            element(1001, 5.6045, -0.1880)
                .with_tag("amenity", "place_of_worship")
                .with_tag("religion", "muslim")
                .with_tag("name", "Central Mosque"),
            element(2002, 5.6012, -0.1851)
                .with_tag("amenity", "place_of_worship")
                .with_tag("religion", "christian")
                .with_tag("name", "St. Mary's"),
        ]
    }

    fn labelling_geocoder() -> ReverseGeocoder {
        let mut port = MockReverseGeocodingPort::new();
        port.expect_reverse()
            .returning(|_, _| Ok("Adabraka, Accra".to_string()));
        ReverseGeocoder::new(Arc::new(port), Arc::new(GeocodeGate::new(DEFAULT_MIN_INTERVAL)))
    }

    fn unused_routes() -> RouteEngine {
        RouteEngine::new(Arc::new(MockRoutingPort::new()))
    }

    fn coordinator_with(places: impl PlaceDiscoveryPort + 'static) -> DiscoveryCoordinator {
        DiscoveryCoordinator::new(
            Arc::new(places),
            labelling_geocoder(),
            OrgClassifier::default(),
            unused_routes(),
            DiscoveryConfig::default(),
        )
    }

    fn places_returning(elements: Vec<RawElement>, times: usize) -> MockPlaceDiscoveryPort {
        let mut places = MockPlaceDiscoveryPort::new();
        places
            .expect_find_places()
            .times(times)
            .returning(move |_, _, _| Ok(elements.clone()));
        places
    }

    /// Answers after a delay, honoring cancellation
    struct SlowPlaces {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlaceDiscoveryPort for SlowPlaces {
        async fn find_places(
            &self,
            _center: GeoLocation,
            _radius_meters: u32,
            cancel: &CancellationToken,
        ) -> Result<Vec<RawElement>, ApplicationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::select! {
                () = cancel.cancelled() => Err(ApplicationError::Cancelled),
                () = tokio::time::sleep(Duration::from_secs(2)) => Ok(accra_elements()),
            }
        }
    }

    #[tokio::test]
    async fn test_accra_end_to_end() {
        let coordinator = coordinator_with(places_returning(accra_elements(), 1));

        let snapshot = coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        assert_eq!(snapshot.status, DiscoveryStatus::Ready);
        assert_eq!(snapshot.location_state, LocationState::Resolved);
        assert_eq!(snapshot.area_label.as_deref(), Some("Adabraka, Accra"));
        assert_eq!(snapshot.organizations.len(), 1);

        let mosque = &snapshot.organizations[0];
        assert_eq!(mosque.name(), "Central Mosque");
        assert_eq!(mosque.category(), OrgCategory::Community);
        assert_eq!(mosque.giving_types(), &[GivingType::Zakat, GivingType::Sadaqah]);

        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.markers[0].id, 1001);
    }

    #[tokio::test]
    async fn test_search_radius_and_center_reach_the_port() {
        let mut places = MockPlaceDiscoveryPort::new();
        places
            .expect_find_places()
            .withf(|center, radius, _| *center == GeoLocation::accra() && *radius == 5000)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let coordinator = coordinator_with(places);

        let snapshot = coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();
        assert_eq!(snapshot.radius_meters, 5000);
        assert!(snapshot.organizations.is_empty());
    }

    #[tokio::test]
    async fn test_failure_publishes_empty_list_and_label() {
        let mut places = MockPlaceDiscoveryPort::new();
        let mut seq = mockall::Sequence::new();
        places
            .expect_find_places()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(accra_elements()));
        places
            .expect_find_places()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| {
                Err(ApplicationError::DiscoveryUnavailable {
                    attempts: 4,
                    message: "HTTP 504".to_string(),
                })
            });
        let coordinator = coordinator_with(places);

        let first = coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();
        assert_eq!(first.organizations.len(), 1);

        let result = coordinator.refresh().await;
        assert!(matches!(
            result,
            Err(ApplicationError::DiscoveryUnavailable { attempts: 4, .. })
        ));

        let snapshot = coordinator.snapshot();
        assert!(matches!(
            snapshot.status,
            DiscoveryStatus::Failed { retryable: true, .. }
        ));
        assert!(snapshot.organizations.is_empty());
        assert!(snapshot.markers.is_empty());
        assert_eq!(snapshot.area_label.as_deref(), Some("Adabraka, Accra"));
    }

    #[tokio::test]
    async fn test_results_sorted_by_numeric_distance() {
        // 900 m sorts before 1.2 km even though "1.2 km" < "900 m" as text
        let elements = vec![
            element(1, 5.6145, -0.1870).with_tag("name", "Farther NGO"),
            element(2, 5.6118, -0.1870).with_tag("name", "Nearer NGO"),
        ];
        let coordinator = coordinator_with(places_returning(elements, 1));

        let snapshot = coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        let names: Vec<&str> = snapshot.organizations.iter().map(Organization::name).collect();
        assert_eq!(names, ["Nearer NGO", "Farther NGO"]);
        assert_eq!(snapshot.organizations[0].distance_label(), "901 m");
        assert_eq!(snapshot.organizations[1].distance_label(), "1.2 km");
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_search_inside_debounce_window_is_ignored() {
        let coordinator = coordinator_with(places_returning(accra_elements(), 1));
        let center = GeoLocation::new(5.6100, -0.1900).unwrap();

        let first = coordinator.search_this_area(center, None).await.unwrap();
        tokio::time::advance(Duration::from_millis(500)).await;
        let second = coordinator.search_this_area(center, None).await.unwrap();

        assert_eq!(first.revision, second.revision);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_search_joins_running_cycle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = Arc::new(coordinator_with(SlowPlaces {
            calls: Arc::clone(&calls),
        }));
        let center = GeoLocation::new(5.6100, -0.1900).unwrap();
        let started = Instant::now();

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.search_this_area(center, None).await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = coordinator.search_this_area(center, None).await.unwrap();

        assert_eq!(second.status, DiscoveryStatus::Ready);
        assert_eq!(second.organizations.len(), 1);
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(first.await.unwrap().unwrap().revision, second.revision);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_search_after_debounce_window_runs() {
        let coordinator = coordinator_with(places_returning(accra_elements(), 2));
        let center = GeoLocation::new(5.6100, -0.1900).unwrap();

        coordinator.search_this_area(center, None).await.unwrap();
        tokio::time::advance(Duration::from_millis(1500)).await;
        coordinator.search_this_area(center, None).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_radius_is_not_debounced() {
        let coordinator = coordinator_with(places_returning(accra_elements(), 2));
        let center = GeoLocation::new(5.6100, -0.1900).unwrap();

        coordinator.search_this_area(center, Some(5000)).await.unwrap();
        coordinator.search_this_area(center, Some(2000)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_area_cancels_superseded_search() {
        let calls = Arc::new(AtomicUsize::new(0));
        let coordinator = Arc::new(coordinator_with(SlowPlaces {
            calls: Arc::clone(&calls),
        }));
        let kumasi = GeoLocation::kumasi();

        let first = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .search_this_area(GeoLocation::accra(), None)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = coordinator.search_this_area(kumasi, None).await.unwrap();

        assert!(matches!(first.await.unwrap(), Err(ApplicationError::Cancelled)));
        assert_eq!(second.search_center, Some(kumasi));
        assert_eq!(second.status, DiscoveryStatus::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Geocoder port that answers after a delay
    struct DelayedLabel(Duration);

    #[async_trait]
    impl ReverseGeocodingPort for DelayedLabel {
        async fn reverse(
            &self,
            _location: GeoLocation,
            _cancel: &CancellationToken,
        ) -> Result<String, ApplicationError> {
            tokio::time::sleep(self.0).await;
            Ok("Osu, Accra".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocode_and_discovery_run_concurrently() {
        let calls = Arc::new(AtomicUsize::new(0));
        let geocoder = ReverseGeocoder::new(
            Arc::new(DelayedLabel(Duration::from_millis(2500))),
            Arc::new(GeocodeGate::new(DEFAULT_MIN_INTERVAL)),
        );
        let coordinator = Arc::new(DiscoveryCoordinator::new(
            Arc::new(SlowPlaces {
                calls: Arc::clone(&calls),
            }),
            geocoder,
            OrgClassifier::default(),
            unused_routes(),
            DiscoveryConfig::default(),
        ));
        let mut rx = coordinator.subscribe();
        let started = Instant::now();

        let task = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.on_location_resolved(GeoLocation::accra()).await })
        };

        let ready = loop {
            rx.changed().await.unwrap();
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.status == DiscoveryStatus::Ready {
                break snapshot;
            }
        };
        let elapsed = started.elapsed();

        // Places take 2 s and the label 2.5 s; run one after the other that is 4.5 s
        assert!(elapsed >= Duration::from_millis(2500));
        assert!(elapsed < Duration::from_secs(3));
        assert_eq!(ready.area_label.as_deref(), Some("Osu, Accra"));
        assert_eq!(ready.organizations.len(), 1);
        assert_eq!(task.await.unwrap().unwrap().revision, ready.revision);
    }

    #[tokio::test]
    async fn test_search_area_measures_from_user_position() {
        let elements = vec![element(1, 5.6100, -0.1900).with_tag("name", "Hope NGO")];
        let coordinator = coordinator_with(places_returning(elements.clone(), 2));

        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();
        let snapshot = coordinator
            .search_this_area(GeoLocation::new(5.6100, -0.1900).unwrap(), None)
            .await
            .unwrap();

        let expected = GeoLocation::accra().distance_meters(&elements[0].location.unwrap());
        let actual = snapshot.organizations[0].distance().meters();
        assert!((actual - expected).abs() < 1e-6);
        assert!(actual > 500.0);
    }

    #[tokio::test]
    async fn test_search_area_without_user_measures_from_center() {
        let elements = vec![element(1, 5.6100, -0.1900).with_tag("name", "Hope NGO")];
        let coordinator = coordinator_with(places_returning(elements, 1));

        let snapshot = coordinator
            .search_this_area(GeoLocation::new(5.6100, -0.1900).unwrap(), None)
            .await
            .unwrap();

        assert_eq!(snapshot.organizations[0].distance_label(), "0 m");
        assert_eq!(snapshot.location_state, LocationState::Idle);
    }

    #[tokio::test]
    async fn test_zero_radius_is_rejected() {
        let coordinator = coordinator_with(MockPlaceDiscoveryPort::new());
        let result = coordinator
            .search_this_area(GeoLocation::accra(), Some(0))
            .await;
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_refresh_without_search_is_rejected() {
        let coordinator = coordinator_with(MockPlaceDiscoveryPort::new());
        assert!(matches!(
            coordinator.refresh().await,
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_transition_leaves_state_unchanged() {
        let coordinator = coordinator_with(MockPlaceDiscoveryPort::new());
        let before = coordinator.snapshot().revision;

        let result = coordinator.on_permission_denied();

        assert!(matches!(result, Err(ApplicationError::Domain(_))));
        assert_eq!(coordinator.location_state(), LocationState::Idle);
        assert_eq!(coordinator.snapshot().revision, before);
    }

    #[tokio::test]
    async fn test_request_location_denied_then_granted() {
        let mut location = MockLocationPort::new();
        let mut seq = mockall::Sequence::new();
        location
            .expect_current_position()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(LocationError::PermissionDenied));
        location
            .expect_current_position()
            .withf(|request| request.high_accuracy)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(PositionFix {
                    location: GeoLocation::accra(),
                    accuracy_m: Some(12.0),
                })
            });

        let coordinator =
            coordinator_with(places_returning(accra_elements(), 1)).with_location_port(Arc::new(location));

        let denied = coordinator.request_location().await;
        assert!(matches!(denied, Err(ApplicationError::LocationDenied)));
        assert_eq!(coordinator.location_state(), LocationState::Denied);

        let snapshot = coordinator.request_location().await.unwrap();
        assert_eq!(snapshot.location_state, LocationState::Resolved);
        assert_eq!(snapshot.user_location, Some(GeoLocation::accra()));
        assert_eq!(snapshot.organizations.len(), 1);
    }

    #[tokio::test]
    async fn test_request_location_unavailable() {
        let mut location = MockLocationPort::new();
        location
            .expect_current_position()
            .returning(|_| Err(LocationError::Unavailable("no fix".to_string())));
        let coordinator =
            coordinator_with(MockPlaceDiscoveryPort::new()).with_location_port(Arc::new(location));

        let result = coordinator.request_location().await;
        assert!(matches!(result, Err(ApplicationError::LocationUnavailable(_))));
        assert_eq!(coordinator.snapshot().location_state, LocationState::Unavailable);
    }

    #[tokio::test]
    async fn test_request_location_without_port() {
        let coordinator = coordinator_with(MockPlaceDiscoveryPort::new());
        let result = coordinator.request_location().await;
        assert!(matches!(result, Err(ApplicationError::LocationUnavailable(_))));
        assert_eq!(coordinator.location_state(), LocationState::Unavailable);
    }

    #[tokio::test]
    async fn test_filters() {
        let elements = vec![
            element(1, 5.6045, -0.1880)
                .with_tag("name", "Nima Clinic")
                .with_tag("office", "ngo")
                .with_tag("phone", "1")
                .with_tag("website", "https://clinic.example"),
            element(2, 5.6050, -0.1880).with_tag("name", "Madrasa Nuriya"),
            element(3, 5.6055, -0.1880).with_tag("name", "Youth Network"),
        ];
        let coordinator = coordinator_with(places_returning(elements, 1));
        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        let health = OrgFilter {
            category: Some(OrgCategory::Health),
            ..Default::default()
        };
        assert_eq!(coordinator.organizations(&health).len(), 1);

        let zakat = OrgFilter {
            giving_type: Some(GivingType::Zakat),
            ..Default::default()
        };
        let names: Vec<String> = coordinator
            .organizations(&zakat)
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        assert_eq!(names, ["Madrasa Nuriya", "Youth Network"]);

        let verified = OrgFilter {
            verified_only: true,
            ..Default::default()
        };
        assert_eq!(coordinator.markers(&verified).len(), 1);
        assert_eq!(coordinator.markers(&OrgFilter::default()).len(), 3);
    }

    fn coordinator_with_routes(routing: MockRoutingPort) -> DiscoveryCoordinator {
        DiscoveryCoordinator::new(
            Arc::new(places_returning(accra_elements(), 1)),
            labelling_geocoder(),
            OrgClassifier::default(),
            RouteEngine::new(Arc::new(routing)),
            DiscoveryConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_directions_to_organization() {
        let mut routing = MockRoutingPort::new();
        routing
            .expect_driving_route()
            .withf(|from, _, _| *from == GeoLocation::accra())
            .times(1)
            .returning(|from, to, _| {
                Ok(RoutedPath {
                    path: vec![from, to],
                    summary: Some(RouteSummary {
                        distance_meters: 150.0,
                        duration_seconds: 40.0,
                    }),
                })
            });
        let coordinator = coordinator_with_routes(routing);
        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        let route = coordinator.directions_to(1001).await.unwrap();
        assert!(route.has_path());
        assert!(matches!(route.viewport, ViewportFit::EndpointsAndPath { .. }));
        assert_eq!(coordinator.snapshot().route, Some(route));

        let cleared = coordinator.clear_route();
        assert!(cleared.route.is_none());
    }

    /// Routing port that answers after a delay, honoring cancellation
    struct SlowRouting;

    #[async_trait]
    impl RoutingPort for SlowRouting {
        async fn driving_route(
            &self,
            from: GeoLocation,
            to: GeoLocation,
            cancel: &CancellationToken,
        ) -> Result<RoutedPath, ApplicationError> {
            tokio::select! {
                () = cancel.cancelled() => Err(ApplicationError::Cancelled),
                () = tokio::time::sleep(Duration::from_secs(1)) => Ok(RoutedPath {
                    path: vec![from, to],
                    summary: None,
                }),
            }
        }
    }

    fn coordinator_with_slow_routes() -> Arc<DiscoveryCoordinator> {
        Arc::new(DiscoveryCoordinator::new(
            Arc::new(places_returning(accra_elements(), 1)),
            labelling_geocoder(),
            OrgClassifier::default(),
            RouteEngine::new(Arc::new(SlowRouting)),
            DiscoveryConfig::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_directions_publishes_no_route() {
        let coordinator = coordinator_with_slow_routes();
        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        let pending = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move { coordinator.directions_to(1001).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        coordinator.clear_route();

        assert!(matches!(pending.await.unwrap(), Err(ApplicationError::Cancelled)));
        assert!(coordinator.snapshot().route.is_none());

        // Asking again after the clear gets a real route
        let route = coordinator.directions_to(1001).await.unwrap();
        assert!(route.has_path());
        assert_eq!(coordinator.snapshot().route, Some(route));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_published_route_is_always_active() {
        let mut routing = MockRoutingPort::new();
        routing.expect_driving_route().returning(|from, to, _| {
            Ok(RoutedPath {
                path: vec![from, to],
                summary: None,
            })
        });
        let coordinator = Arc::new(coordinator_with_routes(routing));
        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();
        let destination = coordinator.snapshot().organizations[0].location();
        let key = RouteKey::new(&GeoLocation::accra(), &destination);

        for _ in 0..50 {
            let directions = {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.directions_to(1001).await })
            };
            let clear = {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.clear_route() })
            };
            let _ = directions.await.unwrap();
            clear.await.unwrap();

            if coordinator.snapshot().route.is_some() {
                assert!(coordinator.routes.is_active(key));
            }
        }
    }

    #[tokio::test]
    async fn test_directions_unknown_org() {
        let coordinator = coordinator_with_routes(MockRoutingPort::new());
        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        assert!(matches!(
            coordinator.directions_to(42).await,
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_directions_without_user_position() {
        let coordinator = coordinator_with_routes(MockRoutingPort::new());
        coordinator
            .search_this_area(GeoLocation::accra(), None)
            .await
            .unwrap();

        assert!(matches!(
            coordinator.directions_to(1001).await,
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_subscribers_see_every_publish() {
        let coordinator = coordinator_with(places_returning(accra_elements(), 1));
        let mut rx = coordinator.subscribe();
        let start = rx.borrow().revision;

        coordinator
            .on_location_resolved(GeoLocation::accra())
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.status, DiscoveryStatus::Ready);
        assert!(latest.revision >= start + 3);
    }

    #[test]
    fn test_filter_matches_everything_by_default() {
        let org = Organization::new(
            1,
            "Youth Network",
            GeoLocation::accra(),
            OrgCategory::Community,
            domain::value_objects::Distance::from_meters(10.0),
        )
        .unwrap();
        assert!(OrgFilter::default().matches(&org));
    }
}

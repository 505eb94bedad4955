//! Map/list view-state controller for the store-finder session.
//!
//! Phases: `Idle → Locating → Ready → Searching → Ready` and
//! `Ready → Detail → Ready`. The controller owns the current location, the
//! discrete search radius, the ranked result set, the selection, and a
//! status message. Collaborators are injected: a [`LocationProvider`] for the
//! device position and an optional [`ProfileSink`] that records the acquired
//! coordinate best-effort (failures are logged, never surfaced).
//!
//! Overlapping searches resolve last-request-wins by request identity: each
//! search takes a generation number, and a search whose generation is no
//! longer current discards its outcome instead of clobbering newer state.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;

use storefind_core::Coordinate;
use storefind_places::PlacesClient;

use crate::aggregate::{run_search, SearchOutcome, SearchPolicy};
use crate::error::SearchError;
use crate::filter::{GroceryFilter, PlacePredicate};
use crate::rank::RankedPlace;

/// Padding added around the bounding box when framing a result set.
const FIT_PADDING_DEG: f64 = 0.02;
/// Smallest allowed camera span when framing a result set.
const MIN_SPAN_DEG: f64 = 0.02;
/// Camera span when focusing a single selected place.
const FOCUS_SPAN_DEG: f64 = 0.01;

/// Errors from the device location service.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The user declined the location permission. The flow fails closed:
    /// no coordinate is recorded and no search can start.
    #[error("location permission denied")]
    PermissionDenied,

    /// The position could not be acquired (no fix, service down, ...).
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the device's current position.
#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Failure of the best-effort profile coordinate write.
#[derive(Debug, Error)]
#[error("profile write failed: {0}")]
pub struct ProfileWriteError(pub String);

/// Optional hook invoked after a successful position acquisition, writing
/// the coordinate back to the user's profile record. Modeled as an explicit
/// collaborator so it can be disabled or awaited in tests instead of being
/// an inline fire-and-forget side effect.
#[allow(async_fn_in_trait)]
pub trait ProfileSink {
    async fn write_last_location(&self, coord: Coordinate) -> Result<(), ProfileWriteError>;
}

/// Sink that records nothing; used when profile write-back is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfileSink;

impl ProfileSink for NoProfileSink {
    async fn write_last_location(&self, _coord: Coordinate) -> Result<(), ProfileWriteError> {
        Ok(())
    }
}

/// The discrete radius choices offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchRadius {
    Km1,
    Km3,
    #[default]
    Km5,
    Km10,
    Km20,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 5] = [
        SearchRadius::Km1,
        SearchRadius::Km3,
        SearchRadius::Km5,
        SearchRadius::Km10,
        SearchRadius::Km20,
    ];

    /// Maps a kilometer value to its radius choice, if offered.
    #[must_use]
    pub fn from_km(km: u32) -> Option<Self> {
        match km {
            1 => Some(SearchRadius::Km1),
            3 => Some(SearchRadius::Km3),
            5 => Some(SearchRadius::Km5),
            10 => Some(SearchRadius::Km10),
            20 => Some(SearchRadius::Km20),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_km(self) -> u32 {
        match self {
            SearchRadius::Km1 => 1,
            SearchRadius::Km3 => 3,
            SearchRadius::Km5 => 5,
            SearchRadius::Km10 => 10,
            SearchRadius::Km20 => 20,
        }
    }

    /// The radius in meters, as the API parameter expects.
    #[must_use]
    pub fn as_meters(self) -> u32 {
        self.as_km() * 1000
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.as_km())
    }
}

/// The session's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Locating,
    Ready,
    Searching,
    Detail,
}

/// A user-visible status, kept distinct so the UI can style errors and
/// benign notices differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Error(String),
    Info(String),
}

/// A map camera region: center plus latitude/longitude spans in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub lat_delta: f64,
    pub lng_delta: f64,
}

/// Frames the user plus every result, with padding and a minimum span.
#[must_use]
pub fn fit_region(user: Coordinate, places: &[RankedPlace]) -> MapRegion {
    let mut min_lat = user.lat;
    let mut max_lat = user.lat;
    let mut min_lng = user.lng;
    let mut max_lng = user.lng;
    for place in places {
        min_lat = min_lat.min(place.coordinate.lat);
        max_lat = max_lat.max(place.coordinate.lat);
        min_lng = min_lng.min(place.coordinate.lng);
        max_lng = max_lng.max(place.coordinate.lng);
    }
    MapRegion {
        center: Coordinate::new((min_lat + max_lat) / 2.0, (min_lng + max_lng) / 2.0),
        lat_delta: (max_lat - min_lat + FIT_PADDING_DEG).max(MIN_SPAN_DEG),
        lng_delta: (max_lng - min_lng + FIT_PADDING_DEG).max(MIN_SPAN_DEG),
    }
}

/// Frames a single place for the selection zoom.
#[must_use]
pub fn focus_region(center: Coordinate) -> MapRegion {
    MapRegion {
        center,
        lat_delta: FOCUS_SPAN_DEG,
        lng_delta: FOCUS_SPAN_DEG,
    }
}

/// Mutable view state guarded by the controller's mutex.
#[derive(Debug)]
struct ViewState {
    phase: SessionPhase,
    location: Option<Coordinate>,
    radius: SearchRadius,
    results: Vec<RankedPlace>,
    selected: Option<String>,
    message: Option<StatusMessage>,
}

/// An owned copy of the view state for inspection and rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub location: Option<Coordinate>,
    pub radius: SearchRadius,
    pub results: Vec<RankedPlace>,
    pub selected: Option<String>,
    pub message: Option<StatusMessage>,
}

/// Drives the store-finder screen's state.
pub struct SessionController<L, S = NoProfileSink, P = GroceryFilter> {
    client: PlacesClient,
    filter: P,
    policy: SearchPolicy,
    location: L,
    profile: Option<S>,
    state: Mutex<ViewState>,
    generation: AtomicU64,
}

impl<L: LocationProvider> SessionController<L> {
    /// A controller with the default grocery filter and search policy and
    /// no profile write-back.
    pub fn new(client: PlacesClient, location: L) -> Self {
        Self::with_parts(client, GroceryFilter::default(), SearchPolicy::default(), location, None)
    }
}

impl<L, S, P> SessionController<L, S, P>
where
    L: LocationProvider,
    S: ProfileSink,
    P: PlacePredicate,
{
    /// A fully wired controller. `profile` is the optional coordinate
    /// write-back hook.
    pub fn with_parts(
        client: PlacesClient,
        filter: P,
        policy: SearchPolicy,
        location: L,
        profile: Option<S>,
    ) -> Self {
        Self {
            client,
            filter,
            policy,
            location,
            profile,
            state: Mutex::new(ViewState {
                phase: SessionPhase::Idle,
                location: None,
                radius: SearchRadius::default(),
                results: Vec::new(),
                selected: None,
                message: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Acquires the device position and transitions to `Ready`.
    ///
    /// On success the coordinate is handed to the profile sink; a sink
    /// failure is logged at warn and never surfaced. On failure the phase
    /// falls back to `Idle` (or `Ready` if a previous location exists) and
    /// the error is both recorded as a status message and returned.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] when the position cannot be acquired.
    pub async fn locate(&self) -> Result<Coordinate, LocationError> {
        {
            let mut st = self.state.lock().await;
            st.phase = SessionPhase::Locating;
        }

        match self.location.current_position().await {
            Ok(coord) => {
                {
                    let mut st = self.state.lock().await;
                    st.location = Some(coord);
                    st.phase = SessionPhase::Ready;
                    st.message = None;
                }
                if let Some(sink) = &self.profile {
                    if let Err(e) = sink.write_last_location(coord).await {
                        tracing::warn!(error = %e, "best-effort profile location write failed");
                    }
                }
                Ok(coord)
            }
            Err(e) => {
                let mut st = self.state.lock().await;
                st.phase = if st.location.is_some() {
                    SessionPhase::Ready
                } else {
                    SessionPhase::Idle
                };
                st.message = Some(StatusMessage::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Runs a search for `keyword` at the session's current radius.
    ///
    /// A stale search (one started before a newer one) discards its outcome
    /// and reports [`SearchOutcome::Superseded`]; only the latest search
    /// updates the result set. An error or a no-results outcome sets a
    /// status message without clearing previously shown results.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoLocation`] — no position has been acquired.
    /// - [`SearchError::EmptyKeyword`] — the keyword is blank.
    /// - [`SearchError::Places`] — the API call failed.
    pub async fn search(&self, keyword: &str) -> Result<SearchOutcome, SearchError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let (user, radius) = {
            let mut st = self.state.lock().await;
            let user = st.location.ok_or(SearchError::NoLocation)?;
            st.phase = SessionPhase::Searching;
            (user, st.radius)
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = run_search(
            &self.client,
            &self.filter,
            user,
            keyword,
            radius.as_meters(),
            &self.policy,
        )
        .await;

        let mut st = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer search owns the state; drop this outcome entirely,
            // including its error.
            tracing::debug!(generation, "discarding superseded search outcome");
            return Ok(SearchOutcome::Superseded);
        }

        st.phase = SessionPhase::Ready;
        match result {
            Ok(SearchOutcome::Found(ranked)) => {
                st.results = ranked.clone();
                st.selected = None;
                st.message = None;
                Ok(SearchOutcome::Found(ranked))
            }
            Ok(SearchOutcome::NoResults { attempts }) => {
                st.message = Some(StatusMessage::Info(
                    "No matching stores found nearby. Try a larger radius or another keyword."
                        .to_owned(),
                ));
                Ok(SearchOutcome::NoResults { attempts })
            }
            Ok(SearchOutcome::Superseded) => Ok(SearchOutcome::Superseded),
            Err(e) => {
                st.message = Some(StatusMessage::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Selects a result, returning the camera region focusing it.
    ///
    /// Selecting the place that is already selected opens the detail view,
    /// matching a double-tap on a list row or a second tap on a map marker.
    /// Returns `None` for an unknown `place_id`.
    pub async fn select(&self, place_id: &str) -> Option<MapRegion> {
        let mut st = self.state.lock().await;
        let coordinate = st
            .results
            .iter()
            .find(|p| p.place_id == place_id)
            .map(|p| p.coordinate)?;

        if st.selected.as_deref() == Some(place_id) {
            st.phase = SessionPhase::Detail;
        } else {
            st.selected = Some(place_id.to_owned());
        }
        Some(focus_region(coordinate))
    }

    /// Closes the detail view, returning to `Ready` with the result set and
    /// selection untouched.
    pub async fn close_detail(&self) {
        let mut st = self.state.lock().await;
        if st.phase == SessionPhase::Detail {
            st.phase = SessionPhase::Ready;
        }
    }

    /// Changes the radius used by subsequent searches.
    pub async fn set_radius(&self, radius: SearchRadius) {
        let mut st = self.state.lock().await;
        st.radius = radius;
    }

    /// The camera region framing the user and the whole result set, or
    /// `None` without a location or results.
    pub async fn fit_all(&self) -> Option<MapRegion> {
        let st = self.state.lock().await;
        let user = st.location?;
        if st.results.is_empty() {
            return None;
        }
        Some(fit_region(user, &st.results))
    }

    /// An owned copy of the current view state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.lock().await;
        SessionSnapshot {
            phase: st.phase,
            location: st.location,
            radius: st.radius,
            results: st.results.clone(),
            selected: st.selected.clone(),
            message: st.message.clone(),
        }
    }
}

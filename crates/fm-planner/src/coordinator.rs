//! The route planning state machine.

use std::sync::Arc;

use tracing::{debug, info};

use fm_catalog::Catalog;
use fm_core::{FacilityId, GeoPoint, PlannerConfig};
use fm_route::{
    validate, PendingRoute, RouteAdapter, RouteCompletion, RouteEndpoint, RouteResult,
    RouteSelection, RoutingEngine,
};

use crate::present::{self, DeviceMarker, Presentation};
use crate::{PlanError, PlanResult, PlannerObserver, PlannerState};

/// Owns the route selection and the current route.
///
/// All mutation goes through the command methods; every other component
/// only reads.  Construct with [`PlannerBuilder`][crate::PlannerBuilder].
///
/// Routing is split in two so the caller decides where the engine call
/// runs:
///
/// ```rust,ignore
/// let pending = coordinator.create_route()?;      // Routing
/// let completion = pending.run().await;           // engine call
/// coordinator.complete_route(completion);         // Routed / PartiallySelected
/// ```
pub struct Coordinator<E: RoutingEngine> {
    pub(crate) catalog:         Arc<Catalog>,
    pub(crate) config:          PlannerConfig,
    pub(crate) adapter:         RouteAdapter<E>,
    pub(crate) device_location: Option<GeoPoint>,
    pub(crate) selection:       RouteSelection,
    pub(crate) state:           PlannerState,
    pub(crate) route:           Option<RouteResult>,
    pub(crate) last_error:      Option<PlanError>,
    pub(crate) route_active:    bool,
    pub(crate) observer:        Box<dyn PlannerObserver>,
}

impl<E: RoutingEngine> Coordinator<E> {
    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn state(&self) -> PlannerState {
        self.state
    }

    pub fn selection(&self) -> &RouteSelection {
        &self.selection
    }

    /// The last successfully computed route, if it is still current.
    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    /// The most recent error, cleared by the next command that succeeds.
    pub fn last_error(&self) -> Option<&PlanError> {
        self.last_error.as_ref()
    }

    /// `true` from a successful validation in `create_route` until the
    /// selection changes or is cleared.  Survives a failed computation.
    pub fn route_active(&self) -> bool {
        self.route_active
    }

    pub fn device_location(&self) -> Option<GeoPoint> {
        self.device_location
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Presentation of the whole catalog.
    pub fn presentation(&self, search: Option<&FacilityId>) -> Presentation {
        present::resolve(self.catalog.iter(), search, &self.selection, self.route_active)
    }

    pub fn device_marker(&self) -> Option<DeviceMarker> {
        present::device_marker(self.device_location, &self.selection, self.route_active)
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Replace the origin.  Any route or in-flight computation is discarded;
    /// nothing is recomputed.
    pub fn set_origin(&mut self, origin: Option<RouteEndpoint>) {
        debug!(?origin, "origin selected");
        self.selection.origin = origin;
        self.selection_changed();
    }

    /// Replace the destination.  Same effects as [`set_origin`](Self::set_origin).
    pub fn set_destination(&mut self, destination: Option<FacilityId>) {
        debug!(?destination, "destination selected");
        self.selection.destination = destination;
        self.selection_changed();
    }

    /// Record the latest device fix, or `None` when it was lost.
    ///
    /// Only read by the next [`create_route`](Self::create_route); the
    /// selection is never changed here.
    pub fn set_device_location(&mut self, location: Option<GeoPoint>) {
        let location = location.filter(|p| p.is_valid());
        debug!(?location, "device location updated");
        self.device_location = location;
    }

    /// Validate the selection and start a computation.
    ///
    /// On a validation error the state is left as it was and the error is
    /// returned and recorded.  On success the coordinator is `Routing` and
    /// the returned request must be run and handed to
    /// [`complete_route`](Self::complete_route).
    pub fn create_route(&mut self) -> PlanResult<PendingRoute<E>> {
        let prior = self.state;
        self.transition(PlannerState::Validating);

        if let Err(e) = validate(&self.selection, self.device_location.is_some()) {
            self.transition(prior);
            return Err(self.report(e.into()));
        }

        let catalog = &self.catalog;
        let origin = self
            .selection
            .origin
            .as_ref()
            .and_then(|o| o.resolve(self.device_location, |id| catalog.position_of(id)));
        let destination = self.selection.destination.as_ref().and_then(|id| catalog.position_of(id));

        let pending = self.adapter.compute_route(origin, destination);
        self.route = None;
        self.last_error = None;
        self.route_active = true;
        self.transition(PlannerState::Routing);
        Ok(pending)
    }

    /// Apply a finished computation.
    ///
    /// Returns `false` and changes nothing when the completion is stale.
    pub fn complete_route(&mut self, completion: RouteCompletion) -> bool {
        let generation = completion.generation();
        let Some(outcome) = self.adapter.accept(completion) else {
            return false;
        };
        match outcome {
            Ok(route) => {
                info!(
                    generation,
                    distance_m = route.distance_m,
                    duration_secs = route.duration_secs,
                    steps = route.instructions.len(),
                    "route ready"
                );
                self.route = Some(route);
                self.transition(PlannerState::Routed);
                if let Some(route) = &self.route {
                    self.observer.on_route_ready(route);
                }
            }
            Err(e) => {
                self.transition(PlannerState::PartiallySelected);
                self.report(e.into());
            }
        }
        true
    }

    /// Cancel any computation and forget the selection.
    pub fn clear_route(&mut self) {
        self.adapter.cancel();
        self.selection = RouteSelection::default();
        self.route = None;
        self.last_error = None;
        self.route_active = false;
        self.transition(PlannerState::Idle);
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn selection_changed(&mut self) {
        self.adapter.cancel();
        self.route = None;
        self.last_error = None;
        self.route_active = false;
        let next = if self.selection.is_empty() {
            PlannerState::Idle
        } else {
            PlannerState::PartiallySelected
        };
        self.transition(next);
    }

    fn transition(&mut self, to: PlannerState) {
        let from = self.state;
        if from == to {
            return;
        }
        debug!(%from, %to, "planner state change");
        self.state = to;
        self.observer.on_state_change(from, to);
    }

    fn report(&mut self, error: PlanError) -> PlanError {
        info!(%error, state = %self.state, "route request rejected");
        self.observer.on_error(&error);
        self.last_error = Some(error.clone());
        error
    }
}

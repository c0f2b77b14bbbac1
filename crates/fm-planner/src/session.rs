//! Session event loop.
//!
//! A [`Session`] is the single task that owns a [`Coordinator`] together
//! with the view state around it (search selection, category filter,
//! viewport).  UI events and routing completions arrive on one `mpsc`
//! queue and are applied strictly in arrival order; after every message a
//! fresh [`Snapshot`] is published on a `watch` channel for the renderer.
//!
//! ```text
//!  SessionHandle::send(UiEvent) ──┐
//!                                 ├─► mpsc ─► Session::run ─► watch ─► Snapshot
//!  spawned engine call ───────────┘   (completion)
//! ```
//!
//! The loop ends once every [`SessionHandle`] is dropped and no routing
//! task is left holding the queue.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use fm_catalog::{Catalog, CategoryCounts};
use fm_core::{Category, FacilityId, GeoPoint, PlannerConfig};
use fm_route::{RouteCompletion, RouteEndpoint, RouteResult, RouteSelection, RoutingEngine};

use crate::present::{self, DeviceMarker, Presentation};
use crate::summary::RouteSummary;
use crate::{Coordinator, PlanError, PlanResult, PlannerState};

const QUEUE_DEPTH: usize = 32;

// ── Events ────────────────────────────────────────────────────────────────────

/// Input from the rendering surface and the device.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// A facility was picked from the search results.
    SearchPick(FacilityId),
    /// The search box was cleared.
    SearchReset,
    /// A facility marker was clicked.
    FacilityClick(FacilityId),
    /// The marker popup was closed.
    PopupClose,
    PickOrigin(Option<RouteEndpoint>),
    PickDestination(Option<FacilityId>),
    /// "Get directions".
    CreateRoute,
    /// "Clear".
    ClearRoute,
    /// New device fix, or `None` when it was lost.
    DeviceLocation(Option<GeoPoint>),
    /// Restrict the map to one category, or show all.
    FilterCategory(Option<Category>),
}

enum Message {
    Ui(UiEvent),
    Completed(RouteCompletion),
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Requested map camera position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom:   u8,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Increases by one with every processed message.
    pub revision:      u64,
    pub state:         PlannerState,
    pub selection:     RouteSelection,
    pub route_active:  bool,
    pub route:         Option<RouteResult>,
    pub summary:       Option<RouteSummary>,
    pub error:         Option<PlanError>,
    pub search:        Option<FacilityId>,
    pub category:      Option<Category>,
    pub counts:        CategoryCounts,
    /// Markers for the facilities that pass the category filter.
    pub presentation:  Presentation,
    pub device_marker: Option<DeviceMarker>,
    pub viewport:      Viewport,
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Sending side of a session, held by the UI.
#[derive(Clone)]
pub struct SessionHandle {
    tx:        mpsc::Sender<Message>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    pub async fn send(&self, event: UiEvent) -> PlanResult<()> {
        self.tx.send(Message::Ui(event)).await.map_err(|_| PlanError::SessionClosed)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Session<E: RoutingEngine> {
    planner:  Coordinator<E>,
    rx:       mpsc::Receiver<Message>,
    tx:       mpsc::WeakSender<Message>,
    out:      watch::Sender<Snapshot>,
    revision: u64,
    search:   Option<FacilityId>,
    category: Option<Category>,
    viewport: Viewport,
}

impl<E: RoutingEngine> Session<E> {
    pub fn new(planner: Coordinator<E>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let viewport = home_view(planner.config());

        let mut session = Self {
            planner,
            rx,
            tx: tx.downgrade(),
            out: watch::channel(Snapshot::placeholder(viewport)).0,
            revision: 0,
            search: None,
            category: None,
            viewport,
        };
        session.out.send_replace(session.snapshot());
        let handle = SessionHandle { tx, snapshots: session.out.subscribe() };
        (session, handle)
    }

    pub fn planner(&self) -> &Coordinator<E> {
        &self.planner
    }

    /// Process messages until every handle is gone.
    pub async fn run(mut self) -> Coordinator<E> {
        info!(facilities = self.planner.catalog().len(), "planner session started");
        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Ui(event) => self.handle_event(event),
                Message::Completed(completion) => {
                    if !self.planner.complete_route(completion) {
                        debug!("stale routing completion ignored");
                    }
                }
            }
            self.revision += 1;
            self.out.send_replace(self.snapshot());
        }
        info!(revision = self.revision, "planner session ended");
        self.planner
    }

    fn handle_event(&mut self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::SearchPick(id) => {
                match self.planner.catalog().position_of(&id) {
                    Some(center) => {
                        self.viewport = Viewport { center, zoom: self.planner.config().focus_zoom };
                    }
                    None => warn!(%id, "search picked an unknown facility"),
                }
                self.search = Some(id);
            }
            UiEvent::SearchReset => {
                self.search = None;
                self.viewport = home_view(self.planner.config());
            }
            UiEvent::FacilityClick(id) => self.search = Some(id),
            UiEvent::PopupClose => self.search = None,
            UiEvent::PickOrigin(origin) => self.planner.set_origin(origin),
            UiEvent::PickDestination(destination) => self.planner.set_destination(destination),
            UiEvent::CreateRoute => {
                // Selection errors are already recorded on the planner.
                if let Ok(pending) = self.planner.create_route() {
                    match self.tx.upgrade() {
                        Some(tx) => {
                            tokio::spawn(async move {
                                let completion = pending.run().await;
                                // A closed queue means the session is gone.
                                let _ = tx.send(Message::Completed(completion)).await;
                            });
                        }
                        None => warn!("session queue closed; routing request dropped"),
                    }
                }
            }
            UiEvent::ClearRoute => self.planner.clear_route(),
            UiEvent::DeviceLocation(location) => self.planner.set_device_location(location),
            UiEvent::FilterCategory(category) => self.category = category,
        }
    }

    fn snapshot(&self) -> Snapshot {
        let planner = &self.planner;
        let catalog: &Catalog = planner.catalog();
        let summary = planner.route().map(|route| {
            RouteSummary::new(route, planner.selection(), catalog, &planner.config().device_location_label)
        });

        Snapshot {
            revision:      self.revision,
            state:         planner.state(),
            selection:     planner.selection().clone(),
            route_active:  planner.route_active(),
            route:         planner.route().cloned(),
            summary,
            error:         planner.last_error().cloned(),
            search:        self.search.clone(),
            category:      self.category,
            counts:        catalog.category_counts(),
            presentation:  present::resolve(
                catalog.filtered(self.category),
                self.search.as_ref(),
                planner.selection(),
                planner.route_active(),
            ),
            device_marker: planner.device_marker(),
            viewport:      self.viewport,
        }
    }
}

fn home_view(config: &PlannerConfig) -> Viewport {
    Viewport { center: config.home_center, zoom: config.overview_zoom }
}

impl Snapshot {
    fn placeholder(viewport: Viewport) -> Self {
        Self {
            revision:      0,
            state:         PlannerState::Idle,
            selection:     RouteSelection::default(),
            route_active:  false,
            route:         None,
            summary:       None,
            error:         None,
            search:        None,
            category:      None,
            counts:        CategoryCounts::default(),
            presentation:  Presentation::default(),
            device_marker: None,
            viewport,
        }
    }
}

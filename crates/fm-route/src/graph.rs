//! Local routing engine over an in-memory road graph.
//!
//! Endpoints are snapped to their nearest road node, the fastest path is
//! found with a [`PathFinder`], and consecutive edges are folded into steps.
//! A new step starts whenever the street name changes or the heading turns
//! by more than [`STRAIGHT_DEG`]; its code is chosen from the turn angle:
//!
//! | Turn (degrees, + = clockwise) | Code                        |
//! |-------------------------------|-----------------------------|
//! | `< 20`                        | `Continue`                  |
//! | `20 .. 60`                    | `SlightRight`/`SlightLeft`  |
//! | `60 .. 120`                   | `Right`/`Left`              |
//! | `120 .. 170`                  | `SharpRight`/`SharpLeft`    |
//! | `>= 170`                      | `TurnAround`                |
//!
//! The first step is always `Head` and the last `DestinationReached`.

use std::future::Future;
use std::sync::Arc;

use fm_core::{EdgeId, GeoPoint};
use fm_network::{Dijkstra, NetworkError, PathFinder, RoadNetwork};

use crate::engine::{EngineError, EngineRoute, EngineStep, RoutingEngine};

/// Turns below this angle on the same street do not start a new step.
pub const STRAIGHT_DEG: f64 = 20.0;

/// Endpoints farther than this from any road node are unreachable.
pub const DEFAULT_MAX_SNAP_M: f64 = 2_000.0;

/// [`RoutingEngine`] backed by an `fm-network` road graph.
///
/// The search runs on tokio's blocking pool, so the adapter's timeout and
/// cancellation take effect while it is still running.  An abandoned search
/// finishes in the background and its answer is discarded.
pub struct GraphEngine<P: PathFinder = Dijkstra> {
    network:    Arc<RoadNetwork>,
    finder:     Arc<P>,
    max_snap_m: f64,
}

impl GraphEngine<Dijkstra> {
    pub fn new(network: RoadNetwork) -> Self {
        Self::with_finder(network, Dijkstra)
    }
}

impl<P: PathFinder> GraphEngine<P> {
    pub fn with_finder(network: RoadNetwork, finder: P) -> Self {
        Self { network: Arc::new(network), finder: Arc::new(finder), max_snap_m: DEFAULT_MAX_SNAP_M }
    }

    pub fn max_snap_m(mut self, metres: f64) -> Self {
        self.max_snap_m = metres;
        self
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Synchronous core of [`RoutingEngine::route`], run on the caller's
    /// thread.
    pub fn route_now(&self, from: GeoPoint, to: GeoPoint) -> Result<EngineRoute, EngineError> {
        plan(&self.network, &*self.finder, self.max_snap_m, from, to)
    }
}

impl<P: PathFinder + 'static> RoutingEngine for GraphEngine<P> {
    fn name(&self) -> &str {
        "graph"
    }

    fn route(
        &self,
        from: GeoPoint,
        to:   GeoPoint,
    ) -> impl Future<Output = Result<EngineRoute, EngineError>> + Send {
        let network = Arc::clone(&self.network);
        let finder = Arc::clone(&self.finder);
        let max_snap_m = self.max_snap_m;
        async move {
            tokio::task::spawn_blocking(move || plan(&network, &*finder, max_snap_m, from, to))
                .await
                .map_err(|e| EngineError::Unavailable(format!("graph search did not finish: {e}")))?
        }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

fn plan<P: PathFinder + ?Sized>(
    net:        &RoadNetwork,
    finder:     &P,
    max_snap_m: f64,
    from:       GeoPoint,
    to:         GeoPoint,
) -> Result<EngineRoute, EngineError> {
    let snap = |pos: GeoPoint| -> Result<_, EngineError> {
        match net.snap_with_distance(pos) {
            Some((node, d)) if d <= max_snap_m => Ok(node),
            Some((_, d)) => Err(EngineError::NoPath(format!(
                "{pos} is {d:.0} m from the nearest road"
            ))),
            None => Err(EngineError::NoPath("road network is empty".to_owned())),
        }
    };
    let start = snap(from)?;
    let end   = snap(to)?;

    let path = finder
        .shortest_path(net, start, end)
        .map_err(|e| match e {
            NetworkError::NoPath { .. } => EngineError::NoPath(e.to_string()),
            NetworkError::NodeNotFound(_) => EngineError::Unavailable(e.to_string()),
        })?;

    // Endpoints lying exactly on their snapped node are not repeated.
    let on_road = path.geometry(net);
    let mut geometry = Vec::with_capacity(on_road.len() + 2);
    if on_road.first() != Some(&from) {
        geometry.push(from);
    }
    geometry.extend(on_road);
    if geometry.last() != Some(&to) {
        geometry.push(to);
    }

    Ok(EngineRoute {
        distance_m:    path.length_m,
        duration_secs: path.travel_secs,
        steps:         describe(net, &path.edges),
        geometry,
    })
}

fn describe(net: &RoadNetwork, edges: &[EdgeId]) -> Vec<EngineStep> {
    let mut steps: Vec<EngineStep> = Vec::new();

    for (i, &edge) in edges.iter().enumerate() {
        let name   = net.edge_name[edge.index()].as_str();
        let length = net.edge_length_m[edge.index()];

        if i == 0 {
            let heading = compass(net.edge_bearing(edge));
            steps.push(EngineStep::new("Head", with_street(&format!("Head {heading}"), "on", name), length));
            continue;
        }

        let prev = edges[i - 1];
        let turn = turn_angle(net.edge_bearing(prev), net.edge_bearing(edge));
        let same_street = net.edge_name[prev.index()] == name;

        if same_street && turn.abs() < STRAIGHT_DEG {
            if let Some(last) = steps.last_mut() {
                last.distance_m += length;
            }
            continue;
        }

        let (code, verb) = classify(turn);
        steps.push(EngineStep::new(code, with_street(verb, "onto", name), length));
    }

    steps.push(EngineStep::new("DestinationReached", "You have arrived at your destination", 0.0));
    steps
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Signed heading change from `from_deg` to `to_deg`, in `(-180, 180]`.
fn turn_angle(from_deg: f64, to_deg: f64) -> f64 {
    let d = (to_deg - from_deg).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

fn classify(turn: f64) -> (&'static str, &'static str) {
    let right = turn > 0.0;
    match turn.abs() {
        a if a < STRAIGHT_DEG => ("Continue", "Continue"),
        a if a < 60.0 => if right { ("SlightRight", "Slight right") } else { ("SlightLeft", "Slight left") },
        a if a < 120.0 => if right { ("Right", "Turn right") } else { ("Left", "Turn left") },
        a if a < 170.0 => if right { ("SharpRight", "Sharp right") } else { ("SharpLeft", "Sharp left") },
        _ => ("TurnAround", "Make a U-turn"),
    }
}

fn compass(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "north", "northeast", "east", "southeast", "south", "southwest", "west", "northwest",
    ];
    POINTS[((bearing + 22.5).rem_euclid(360.0) / 45.0) as usize % 8]
}

fn with_street(lead: &str, preposition: &str, street: &str) -> String {
    if street.is_empty() {
        lead.to_owned()
    } else {
        format!("{lead} {preposition} {street}")
    }
}

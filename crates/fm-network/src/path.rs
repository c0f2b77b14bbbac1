//! Shortest-path trait and default Dijkstra implementation.
//!
//! # Cost units
//!
//! Costs are summed in **milliseconds** (`u32`, saturating) from
//! `edge_travel_ms`.  [`Path`] exposes totals in metres and seconds.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fm_core::{EdgeId, GeoPoint, NodeId};

use crate::network::RoadNetwork;
use crate::{NetworkError, NetworkResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// An ordered edge sequence from a source node to a destination node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// The node the path starts at.  Needed to describe trivial paths.
    pub source: NodeId,
    /// Edges to traverse in order.
    pub edges: Vec<EdgeId>,
    /// Sum of edge lengths in metres.
    pub length_m: f64,
    /// Sum of edge travel times in seconds.
    pub travel_secs: f64,
}

impl Path {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Visited nodes in order, source first.
    pub fn nodes(&self, network: &RoadNetwork) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(self.source);
        nodes.extend(self.edges.iter().map(|e| network.edge_to[e.index()]));
        nodes
    }

    /// Polyline of node positions along the path.
    pub fn geometry(&self, network: &RoadNetwork) -> Vec<GeoPoint> {
        self.nodes(network)
            .into_iter()
            .map(|n| network.node_pos[n.index()])
            .collect()
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path algorithm.
///
/// Implementations must be `Send + Sync` so the routing engine that owns
/// them can be shared with the task computing a route.
pub trait PathFinder: Send + Sync {
    /// Fastest path from `from` to `to`.
    ///
    /// `from == to` yields an empty path, not an error.
    fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> NetworkResult<Path>;
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, keyed on travel
/// time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl PathFinder for Dijkstra {
    fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> NetworkResult<Path> {
        for node in [from, to] {
            if !network.contains(node) {
                return Err(NetworkError::NodeNotFound(node));
            }
        }
        dijkstra(network, from, to)
    }
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> NetworkResult<Path> {
    if from == to {
        return Ok(Path { source: from, edges: vec![], length_m: 0.0, travel_secs: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![u32::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Reverse turns the max-heap into a min-heap; NodeId breaks ties
    // deterministically.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(network.edge_travel_ms[edge.index()]);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(NetworkError::NoPath { from, to })
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total_ms:  u32,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    let length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();
    Path {
        source: from,
        edges,
        length_m,
        travel_secs: f64::from(total_ms) / 1000.0,
    }
}

//! The street graph used by the local routing engine.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row** form.  Given a
//! `NodeId n`, its outgoing edges are the contiguous `EdgeId` range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Every per-edge array (`edge_from`, `edge_to`, `edge_length_m`,
//! `edge_travel_ms`) is sorted by source node and indexed by `EdgeId`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  The
//! routing engine uses it to snap an endpoint coordinate (a facility or the
//! device fix) onto the road graph.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use fm_core::{EdgeId, GeoPoint, NodeId};

use crate::{NetworkError, NetworkResult};

/// R-tree entry: `[lat, lon]` tagged with its node.  Distances are squared
/// degrees, which ranks candidates correctly inside one city; the winner's
/// distance in metres comes from `GeoPoint::distance_m`.
type SnapEntry = GeomWithData<[f64; 2], NodeId>;

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Street graph with outgoing edges grouped per node and an R-tree over
/// node positions.  Built once by [`RoadNetworkBuilder`], then read-only.
pub struct RoadNetwork {
    /// `node_pos[n]` is where node `n` sits.
    pub node_pos: Vec<GeoPoint>,

    /// Row offsets into the edge arrays, one more than there are nodes.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed to walk a path back to its start).
    pub edge_from: Vec<NodeId>,

    /// Head of each edge.
    pub edge_to: Vec<NodeId>,

    /// Metres.
    pub edge_length_m: Vec<f64>,

    /// Travel time in milliseconds.  Used as the shortest-path cost.
    pub edge_travel_ms: Vec<u32>,

    /// Street name of each edge; empty for unnamed segments.
    pub edge_name: Vec<String>,

    snap_index: RTree<SnapEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every query against it finds nothing.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }


    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Position of `node`, or [`NetworkError::NodeNotFound`].
    pub fn position(&self, node: NodeId) -> NetworkResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(NetworkError::NodeNotFound(node))
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Edges leaving `node`, in storage order.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Compass bearing of `edge` from its source to its destination node.
    pub fn edge_bearing(&self, edge: EdgeId) -> f64 {
        let from = self.node_pos[self.edge_from[edge.index()].index()];
        let to   = self.node_pos[self.edge_to[edge.index()].index()];
        from.bearing_deg(to)
    }

    // ── Snapping ──────────────────────────────────────────────────────────

    /// Nearest road node to `pos`, or `None` if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.snap_index
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|entry| entry.data)
    }

    /// Nearest road node to `pos` together with its great-circle distance in
    /// metres.
    pub fn snap_with_distance(&self, pos: GeoPoint) -> Option<(NodeId, f64)> {
        self.snap_to_node(pos)
            .map(|id| (id, pos.distance_m(self.node_pos[id.index()])))
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collects nodes and street segments in any order; [`build`](Self::build)
/// sorts them into a [`RoadNetwork`].
///
/// # Example
///
/// ```
/// use fm_core::GeoPoint;
/// use fm_network::RoadNetworkBuilder;
///
/// let mut streets = RoadNetworkBuilder::new();
/// let a = streets.add_node(GeoPoint::new(3.590, 98.655));
/// let c = streets.add_node(GeoPoint::new(3.583, 98.669));
/// streets.add_road(a, c, 1_700.0, 150_000, "Jl. Imam Bonjol");
/// let net = streets.build();
/// assert_eq!((net.node_count(), net.edge_count()), (2, 2));
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    travel_ms: u32,
    name:      String,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are handed out densely from 0.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.nodes.push(pos);
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// One-way segment `from → to`.
    pub fn add_directed_edge(
        &mut self,
        from:      NodeId,
        to:        NodeId,
        length_m:  f64,
        travel_ms: u32,
        name:      impl Into<String>,
    ) {
        self.raw_edges.push(RawEdge { from, to, length_m, travel_ms, name: name.into() });
    }

    /// Two-way segment: one edge per direction, same length, time and name.
    pub fn add_road(
        &mut self,
        a:         NodeId,
        b:         NodeId,
        length_m:  f64,
        travel_ms: u32,
        name:      impl Into<String>,
    ) {
        let name = name.into();
        self.add_directed_edge(a, b, length_m, travel_ms, name.clone());
        self.add_directed_edge(b, a, length_m, travel_ms, name);
    }

    /// Two-way road whose length is the great-circle distance between its
    /// nodes, driven at `speed_kmh`.
    pub fn add_road_at_speed(&mut self, a: NodeId, b: NodeId, speed_kmh: f64, name: impl Into<String>) {
        let length_m = self.nodes[a.index()].distance_m(self.nodes[b.index()]);
        let travel_ms = (length_m / (speed_kmh / 3.6) * 1000.0).round() as u32;
        self.add_road(a, b, length_m, travel_ms, name);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Sort edges by tail node, lay out the offsets and bulk-load the R-tree.
    pub fn build(self) -> RoadNetwork {
        let RoadNetworkBuilder { nodes, raw_edges: mut edges } = self;

        // Stable: a node's out-edges keep their insertion order, which makes
        // Dijkstra tie-breaking reproducible.
        edges.sort_by_key(|e| e.from);

        // Walk the sorted edges once, recording where each node's run starts.
        let mut node_out_start = Vec::with_capacity(nodes.len() + 1);
        let mut cursor = 0;
        for node in 0..nodes.len() {
            node_out_start.push(cursor as u32);
            while edges.get(cursor).is_some_and(|e| e.from.index() == node) {
                cursor += 1;
            }
        }
        node_out_start.push(cursor as u32);
        debug_assert_eq!(cursor, edges.len(), "edge references a node that was never added");

        let snap_index = RTree::bulk_load(
            nodes
                .iter()
                .enumerate()
                .map(|(i, p)| SnapEntry::new([p.lat, p.lon], NodeId(i as u32)))
                .collect(),
        );

        let mut net = RoadNetwork {
            node_pos:       nodes,
            node_out_start,
            edge_from:      Vec::with_capacity(edges.len()),
            edge_to:        Vec::with_capacity(edges.len()),
            edge_length_m:  Vec::with_capacity(edges.len()),
            edge_travel_ms: Vec::with_capacity(edges.len()),
            edge_name:      Vec::with_capacity(edges.len()),
            snap_index,
        };
        for RawEdge { from, to, length_m, travel_ms, name } in edges {
            net.edge_from.push(from);
            net.edge_to.push(to);
            net.edge_length_m.push(length_m);
            net.edge_travel_ms.push(travel_ms);
            net.edge_name.push(name);
        }
        net
    }
}

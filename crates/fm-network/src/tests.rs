//! Unit tests for fm-network.

#[cfg(test)]
mod helpers {
    use fm_core::{GeoPoint, NodeId};
    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// One city block south of the school district.
    ///
    /// ```text
    ///   d ──── Jl. Pasar ──── e        lat 3.585
    ///   │                     │
    ///  Jl. Pasar          Jl. Sekolah
    ///   │                     │
    ///   a ── Jl. Pelajar ── b ── c     lat 3.580
    /// 98.660             98.665  98.670
    /// ```
    ///
    /// Pelajar and Sekolah are quick (40 s + 40 s + 55 s); the Pasar detour
    /// is congested (120 s + 90 s), so the fastest a→e goes through b and c.
    pub struct Block {
        pub net: RoadNetwork,
        pub a:   NodeId,
        pub b:   NodeId,
        pub c:   NodeId,
        pub d:   NodeId,
        pub e:   NodeId,
    }

    pub const A: GeoPoint = GeoPoint { lat: 3.580, lon: 98.660 };
    pub const B: GeoPoint = GeoPoint { lat: 3.580, lon: 98.665 };
    pub const C: GeoPoint = GeoPoint { lat: 3.580, lon: 98.670 };
    pub const E: GeoPoint = GeoPoint { lat: 3.585, lon: 98.670 };

    pub fn block() -> Block {
        let mut builder = RoadNetworkBuilder::new();
        let a = builder.add_node(A);
        let b = builder.add_node(B);
        let c = builder.add_node(C);
        let d = builder.add_node(GeoPoint::new(3.585, 98.660));
        let e = builder.add_node(E);

        builder.add_road(a, b, 400.0, 40_000, "Jl. Pelajar");
        builder.add_road(b, c, 400.0, 40_000, "Jl. Pelajar");
        builder.add_road(c, e, 550.0, 55_000, "Jl. Sekolah");
        builder.add_road(a, d, 550.0, 120_000, "Jl. Pasar");
        builder.add_road(d, e, 1_100.0, 90_000, "Jl. Pasar");

        Block { net: builder.build(), a, b, c, d, e }
    }

    /// The outgoing edge `from → to`.
    pub fn edge_between(net: &RoadNetwork, from: NodeId, to: NodeId) -> Option<fm_core::EdgeId> {
        net.out_edges(from).find(|e| net.edge_to[e.index()] == to)
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fm_core::{GeoPoint, NodeId};
    use crate::{NetworkError, RoadNetworkBuilder};
    use super::helpers::{block, edge_between, B};

    #[test]
    fn no_nodes_no_edges() {
        let net = RoadNetworkBuilder::default().build();
        assert!(net.is_empty());
        assert_eq!((net.node_count(), net.edge_count()), (0, 0));
    }

    #[test]
    fn every_road_is_two_way() {
        let blk = block();
        assert_eq!(blk.net.node_count(), 5);
        assert_eq!(blk.net.edge_count(), 10);
        for node in [blk.a, blk.b, blk.c, blk.d, blk.e] {
            assert_eq!(blk.net.out_degree(node), 2, "node {node}");
        }
    }

    #[test]
    fn csr_rows_hold_only_their_own_edges() {
        let blk = block();
        for node in [blk.a, blk.b, blk.c, blk.d, blk.e] {
            assert!(blk.net.out_edges(node).all(|e| blk.net.edge_from[e.index()] == node));
        }
        let targets: Vec<NodeId> = blk.net.out_edges(blk.b).map(|e| blk.net.edge_to[e.index()]).collect();
        assert!(targets.contains(&blk.a) && targets.contains(&blk.c));
    }

    #[test]
    fn street_names_survive_sorting() {
        let blk = block();
        let pelajar = edge_between(&blk.net, blk.c, blk.b).unwrap();
        let sekolah = edge_between(&blk.net, blk.e, blk.c).unwrap();
        assert_eq!(blk.net.edge_name[pelajar.index()], "Jl. Pelajar");
        assert_eq!(blk.net.edge_name[sekolah.index()], "Jl. Sekolah");
    }

    #[test]
    fn speed_based_road_uses_haversine_length() {
        let mut builder = RoadNetworkBuilder::new();
        let south = builder.add_node(GeoPoint::new(3.57, 98.68));
        let north = builder.add_node(GeoPoint::new(3.58, 98.68));
        builder.add_road_at_speed(south, north, 36.0, "Jl. Sisingamangaraja");
        let net = builder.build();

        assert_eq!(net.edge_count(), 2);
        let metres = net.edge_length_m[0];
        assert!((metres - 1_112.0).abs() < 5.0, "got {metres}");
        // 36 km/h is 10 m/s.
        let secs = f64::from(net.edge_travel_ms[0]) / 1000.0;
        assert!((secs - metres / 10.0).abs() < 0.01);
    }

    #[test]
    fn positions_by_node_id() {
        let blk = block();
        assert_eq!(blk.net.position(blk.b), Ok(B));
        assert!(blk.net.contains(blk.e));

        let missing = NodeId(17);
        assert!(!blk.net.contains(missing));
        assert_eq!(blk.net.position(missing), Err(NetworkError::NodeNotFound(missing)));
    }

    #[test]
    fn bearings_of_block_edges() {
        let blk = block();
        let east = edge_between(&blk.net, blk.a, blk.b).unwrap();
        let north = edge_between(&blk.net, blk.c, blk.e).unwrap();
        let west = edge_between(&blk.net, blk.c, blk.b).unwrap();
        assert!((blk.net.edge_bearing(east) - 90.0).abs() < 1e-3);
        assert!(blk.net.edge_bearing(north).abs() < 1e-6);
        assert!((blk.net.edge_bearing(west) - 270.0).abs() < 1e-3);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use fm_core::GeoPoint;
    use crate::RoadNetwork;
    use super::helpers::{block, A, C};

    #[test]
    fn point_on_a_node_snaps_to_it() {
        let blk = block();
        assert_eq!(blk.net.snap_to_node(A), Some(blk.a));
        assert_eq!(blk.net.snap_to_node(C), Some(blk.c));
    }

    #[test]
    fn picks_the_closer_of_two_neighbours() {
        let blk = block();
        assert_eq!(blk.net.snap_to_node(GeoPoint::new(3.5801, 98.6620)), Some(blk.a));
        assert_eq!(blk.net.snap_to_node(GeoPoint::new(3.5801, 98.6635)), Some(blk.b));
    }

    #[test]
    fn reports_snap_distance() {
        let blk = block();
        // ~111 m south of a.
        let (node, metres) = blk.net.snap_with_distance(GeoPoint::new(3.579, 98.660)).unwrap();
        assert_eq!(node, blk.a);
        assert!((metres - 111.2).abs() < 1.0, "got {metres}");
    }

    #[test]
    fn nothing_to_snap_to() {
        let net = RoadNetwork::empty();
        assert_eq!(net.snap_to_node(A), None);
        assert_eq!(net.snap_with_distance(A), None);
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dijkstra {
    use fm_core::{GeoPoint, NodeId};
    use crate::{Dijkstra, NetworkError, PathFinder, RoadNetworkBuilder};
    use super::helpers::{block, A, B, C, E};

    #[test]
    fn start_equals_goal() {
        let blk = block();
        let path = Dijkstra.shortest_path(&blk.net, blk.d, blk.d).unwrap();
        assert!(path.is_trivial());
        assert_eq!((path.length_m, path.travel_secs), (0.0, 0.0));
        assert_eq!(path.nodes(&blk.net), vec![blk.d]);
    }

    #[test]
    fn prefers_quicker_streets_over_shorter_hops() {
        let blk = block();
        let path = Dijkstra.shortest_path(&blk.net, blk.a, blk.e).unwrap();

        assert_eq!(path.nodes(&blk.net), vec![blk.a, blk.b, blk.c, blk.e]);
        assert_eq!(path.travel_secs, 135.0);
        assert_eq!(path.length_m, 1_350.0);
        assert_eq!(path.geometry(&blk.net), vec![A, B, C, E]);
    }

    #[test]
    fn reverse_trip_takes_the_same_streets() {
        let blk = block();
        let path = Dijkstra.shortest_path(&blk.net, blk.e, blk.a).unwrap();
        assert_eq!(path.nodes(&blk.net), vec![blk.e, blk.c, blk.b, blk.a]);
    }

    #[test]
    fn islands_are_unreachable() {
        let mut builder = RoadNetworkBuilder::new();
        let here = builder.add_node(GeoPoint::new(3.58, 98.66));
        let there = builder.add_node(GeoPoint::new(3.60, 98.69));
        let net = builder.build();
        assert_eq!(
            Dijkstra.shortest_path(&net, here, there),
            Err(NetworkError::NoPath { from: here, to: there })
        );
    }

    #[test]
    fn one_way_street_has_no_way_back() {
        let mut builder = RoadNetworkBuilder::new();
        let entry = builder.add_node(GeoPoint::new(3.58, 98.66));
        let exit = builder.add_node(GeoPoint::new(3.58, 98.67));
        builder.add_directed_edge(entry, exit, 1_100.0, 80_000, "Jl. Satu Arah");
        let net = builder.build();

        let forward = Dijkstra.shortest_path(&net, entry, exit).unwrap();
        assert_eq!(forward.travel_secs, 80.0);
        assert!(matches!(
            Dijkstra.shortest_path(&net, exit, entry),
            Err(NetworkError::NoPath { .. })
        ));
    }

    #[test]
    fn goal_outside_the_network() {
        let blk = block();
        let missing = NodeId(42);
        assert_eq!(
            Dijkstra.shortest_path(&blk.net, blk.a, missing),
            Err(NetworkError::NodeNotFound(missing))
        );
    }
}

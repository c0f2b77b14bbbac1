//! Unit tests for fm-route.

#[cfg(test)]
mod helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use fm_core::GeoPoint;

    use crate::{EngineError, EngineRoute, EngineStep, RoutingEngine};

    pub type CallLog = Arc<Mutex<Vec<(GeoPoint, GeoPoint)>>>;

    /// Answers every request with the same response and records the calls.
    pub struct FixedEngine {
        pub response: Result<EngineRoute, EngineError>,
        pub calls:    CallLog,
    }

    impl FixedEngine {
        pub fn ok(route: EngineRoute) -> (Self, CallLog) {
            Self::with(Ok(route))
        }

        pub fn with(response: Result<EngineRoute, EngineError>) -> (Self, CallLog) {
            let calls = CallLog::default();
            (Self { response, calls: Arc::clone(&calls) }, calls)
        }
    }

    impl RoutingEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<EngineRoute, EngineError> {
            self.calls.lock().unwrap().push((from, to));
            self.response.clone()
        }
    }

    /// Returns a route whose distance is the 1-based call number.
    #[derive(Default)]
    pub struct CountingEngine {
        pub calls: AtomicUsize,
    }

    impl RoutingEngine for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        async fn route(&self, _from: GeoPoint, _to: GeoPoint) -> Result<EngineRoute, EngineError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(EngineRoute { distance_m: n as f64, ..EngineRoute::default() })
        }
    }

    /// Sleeps before answering.
    pub struct SlowEngine {
        pub delay: Duration,
    }

    impl RoutingEngine for SlowEngine {
        fn name(&self) -> &str {
            "slow"
        }

        async fn route(&self, _from: GeoPoint, _to: GeoPoint) -> Result<EngineRoute, EngineError> {
            tokio::time::sleep(self.delay).await;
            Ok(EngineRoute::default())
        }
    }

    /// Never answers.
    pub struct StuckEngine;

    impl RoutingEngine for StuckEngine {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn route(&self, _from: GeoPoint, _to: GeoPoint) -> Result<EngineRoute, EngineError> {
            std::future::pending().await
        }
    }

    pub fn two_step_route() -> EngineRoute {
        EngineRoute {
            distance_m:    2400.0,
            duration_secs: 360.0,
            steps: vec![
                EngineStep::new("Head", "Head north", 800.0),
                EngineStep::new("Right", "Turn right", 1600.0),
            ],
            geometry: vec![GeoPoint::new(3.60, 98.67), GeoPoint::new(3.5829, 98.6694)],
        }
    }

    pub const A: GeoPoint = GeoPoint { lat: 3.60, lon: 98.67 };
    pub const B: GeoPoint = GeoPoint { lat: 3.5829, lon: 98.6694 };
    pub const TIMEOUT: Duration = Duration::from_secs(10);
}

// ── Endpoint model ────────────────────────────────────────────────────────────

#[cfg(test)]
mod endpoint {
    use fm_core::{FacilityId, GeoPoint};

    use crate::{validate, EndpointRole, RouteEndpoint, RouteSelection, SelectionError};

    fn sel(origin: Option<RouteEndpoint>, dest: Option<&str>) -> RouteSelection {
        RouteSelection::new(origin, dest.map(FacilityId::from))
    }

    #[test]
    fn empty_and_partial_selections_are_incomplete() {
        for s in [
            sel(None, None),
            sel(Some(RouteEndpoint::facility("s1")), None),
            sel(Some(RouteEndpoint::DeviceLocation), None),
            sel(None, Some("s2")),
        ] {
            assert_eq!(validate(&s, true), Err(SelectionError::IncompleteSelection));
            assert_eq!(validate(&s, false), Err(SelectionError::IncompleteSelection));
        }
    }

    #[test]
    fn device_origin_needs_a_fix() {
        let s = sel(Some(RouteEndpoint::DeviceLocation), Some("s1"));
        assert_eq!(validate(&s, false), Err(SelectionError::DeviceLocationUnavailable));
        assert_eq!(validate(&s, true), Ok(()));
    }

    #[test]
    fn same_facility_rejected() {
        let s = sel(Some(RouteEndpoint::facility("s1")), Some("s1"));
        assert_eq!(validate(&s, true), Err(SelectionError::SameEndpoint));
        assert_eq!(validate(&s, false), Err(SelectionError::SameEndpoint));
    }

    #[test]
    fn distinct_facilities_pass_without_device() {
        let s = sel(Some(RouteEndpoint::facility("s1")), Some("s2"));
        assert_eq!(validate(&s, false), Ok(()));
    }

    #[test]
    fn incompleteness_is_reported_before_device_check() {
        let s = sel(Some(RouteEndpoint::DeviceLocation), None);
        assert_eq!(validate(&s, false), Err(SelectionError::IncompleteSelection));
    }

    #[test]
    fn selection_queries() {
        let s = sel(Some(RouteEndpoint::facility("s1")), Some("s2"));
        assert!(s.is_complete());
        assert_eq!(s.endpoint_count(), 2);
        assert_eq!(s.role_of(&"s1".into()), Some(EndpointRole::Origin));
        assert_eq!(s.role_of(&"s2".into()), Some(EndpointRole::Destination));
        assert_eq!(s.role_of(&"s3".into()), None);
        assert!(!s.origin_is_device());

        let d = sel(Some(RouteEndpoint::DeviceLocation), None);
        assert!(d.origin_is_device());
        assert_eq!(d.endpoint_count(), 1);
        assert!(RouteSelection::default().is_empty());
    }

    #[test]
    fn resolve_endpoints() {
        let here = GeoPoint::new(3.60, 98.67);
        let lookup = |id: &FacilityId| (id.as_str() == "s1").then_some(GeoPoint::new(1.0, 2.0));

        assert_eq!(RouteEndpoint::DeviceLocation.resolve(Some(here), lookup), Some(here));
        assert_eq!(RouteEndpoint::DeviceLocation.resolve(None, lookup), None);
        assert_eq!(RouteEndpoint::facility("s1").resolve(None, lookup), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(RouteEndpoint::facility("zz").resolve(Some(here), lookup), None);
    }
}

// ── Result normalization ──────────────────────────────────────────────────────

#[cfg(test)]
mod result {
    use crate::{EngineError, Instruction, Maneuver, RouteResult, RoutingError};

    #[test]
    fn maneuver_vocabulary() {
        for code in ["Left", "SlightLeft", "SharpLeft", "slight left", "SHARP_LEFT"] {
            assert_eq!(Maneuver::from_code(code), Maneuver::Left, "{code}");
        }
        for code in ["Right", "SlightRight", "SharpRight", "slight-right"] {
            assert_eq!(Maneuver::from_code(code), Maneuver::Right, "{code}");
        }
        for code in ["Straight", "Continue", "Head", "straight"] {
            assert_eq!(Maneuver::from_code(code), Maneuver::Straight, "{code}");
        }
    }

    #[test]
    fn unrecognized_codes_are_unknown() {
        for code in ["TurnAround", "Roundabout", "DestinationReached", "WaypointReached", "", "🚗"] {
            assert_eq!(Maneuver::from_code(code), Maneuver::Unknown, "{code}");
        }
    }

    #[test]
    fn engine_route_is_normalized() {
        let r = RouteResult::from_engine(super::helpers::two_step_route());
        assert_eq!(r.distance_m, 2400.0);
        assert_eq!(r.duration_secs, 360.0);
        assert_eq!(
            r.instructions,
            vec![
                Instruction::new(Maneuver::Straight, "Head north", 800.0),
                Instruction::new(Maneuver::Right, "Turn right", 1600.0),
            ]
        );
        assert_eq!(r.geometry.len(), 2);
    }

    #[test]
    fn engine_errors_map_to_routing_errors() {
        assert_eq!(RoutingError::from(EngineError::NoPath("x".into())), RoutingError::NoRouteFound);
        assert_eq!(
            RoutingError::from(EngineError::Unavailable("down".into())),
            RoutingError::EngineUnavailable("down".into())
        );
        assert_eq!(
            RoutingError::from(EngineError::InvalidInput("lat".into())),
            RoutingError::InvalidCoordinates
        );
    }
}

// ── Graph engine ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use fm_core::{GeoPoint, NodeId};
    use fm_network::{Dijkstra, NetworkResult, Path, PathFinder, RoadNetwork, RoadNetworkBuilder};

    use crate::{EngineError, GraphEngine, Maneuver, RouteAdapter, RouteResult, RoutingError};

    const A: GeoPoint = GeoPoint { lat: 3.580, lon: 98.660 };
    const B: GeoPoint = GeoPoint { lat: 3.590, lon: 98.668 };

    /// An L-shaped street plan:
    ///
    /// ```text
    ///   2 ── 3          (north = up)
    ///   │
    ///   1
    ///   │
    ///   0
    /// ```
    /// 0→1→2 runs north along "Jl. Utara", 2→3 turns east onto "Jl. Timur".
    fn l_shaped() -> GraphEngine {
        GraphEngine::new(l_shaped_network())
    }

    fn l_shaped_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(GeoPoint::new(3.580, 98.660));
        let n1 = b.add_node(GeoPoint::new(3.585, 98.660));
        let n2 = b.add_node(GeoPoint::new(3.590, 98.660));
        let n3 = b.add_node(GeoPoint::new(3.590, 98.668));
        b.add_road(n0, n1, 550.0, 40_000, "Jl. Utara");
        b.add_road(n1, n2, 550.0, 40_000, "Jl. Utara");
        b.add_road(n2, n3, 900.0, 60_000, "Jl. Timur");
        b.build()
    }

    #[test]
    fn folds_straight_segments_and_detects_turns() {
        let engine = l_shaped();
        let route = engine
            .route_now(GeoPoint::new(3.580, 98.660), GeoPoint::new(3.590, 98.668))
            .unwrap();

        assert_eq!(route.distance_m, 2000.0);
        assert_eq!(route.duration_secs, 140.0);

        let codes: Vec<_> = route.steps.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["Head", "Right", "DestinationReached"]);
        assert_eq!(route.steps[0].text, "Head north on Jl. Utara");
        assert_eq!(route.steps[0].distance_m, 1100.0);
        assert_eq!(route.steps[1].text, "Turn right onto Jl. Timur");

        let result = RouteResult::from_engine(route);
        let maneuvers: Vec<_> = result.instructions.iter().map(|i| i.maneuver).collect();
        assert_eq!(maneuvers, [Maneuver::Straight, Maneuver::Right, Maneuver::Unknown]);
    }

    #[test]
    fn reverse_direction_turns_left() {
        let engine = l_shaped();
        let route = engine
            .route_now(GeoPoint::new(3.590, 98.668), GeoPoint::new(3.580, 98.660))
            .unwrap();
        let codes: Vec<_> = route.steps.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["Head", "Left", "DestinationReached"]);
        assert_eq!(route.steps[0].text, "Head west on Jl. Timur");
    }

    #[test]
    fn geometry_runs_from_endpoint_to_endpoint() {
        let engine = l_shaped();
        let from = GeoPoint::new(3.5801, 98.6601);
        let to = GeoPoint::new(3.5899, 98.6679);
        let route = engine.route_now(from, to).unwrap();
        assert_eq!(route.geometry.first(), Some(&from));
        assert_eq!(route.geometry.last(), Some(&to));
        assert_eq!(route.geometry.len(), 4 + 2);
    }

    #[test]
    fn far_endpoint_is_unreachable() {
        let engine = l_shaped().max_snap_m(500.0);
        let err = engine
            .route_now(GeoPoint::new(3.580, 98.660), GeoPoint::new(3.700, 98.660))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoPath(_)));
    }

    #[test]
    fn disconnected_graph_has_no_path() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node(GeoPoint::new(3.58, 98.66));
        b.add_node(GeoPoint::new(3.59, 98.66));
        let engine = GraphEngine::new(b.build());
        let err = engine
            .route_now(GeoPoint::new(3.58, 98.66), GeoPoint::new(3.59, 98.66))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoPath(_)));
    }

    #[test]
    fn empty_network_has_no_path() {
        let engine = GraphEngine::new(RoadNetworkBuilder::new().build());
        assert!(matches!(
            engine.route_now(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)),
            Err(EngineError::NoPath(_))
        ));
    }

    #[test]
    fn same_node_route_only_arrives() {
        let engine = l_shaped();
        let p = GeoPoint::new(3.580, 98.660);
        let route = engine.route_now(p, p).unwrap();
        assert_eq!(route.distance_m, 0.0);
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.steps[0].code, "DestinationReached");
    }

    #[test]
    fn endpoints_on_nodes_are_not_repeated() {
        let engine = l_shaped();
        let from = GeoPoint::new(3.580, 98.660);
        let to = GeoPoint::new(3.590, 98.668);
        let route = engine.route_now(from, to).unwrap();
        assert_eq!(
            route.geometry,
            vec![from, GeoPoint::new(3.585, 98.660), GeoPoint::new(3.590, 98.660), to]
        );
        assert!(route.geometry.windows(2).all(|w| w[0] != w[1]));
    }

    /// Dijkstra that first sleeps on the calling thread.
    struct SluggishFinder {
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl PathFinder for SluggishFinder {
        fn shortest_path(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> NetworkResult<Path> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Dijkstra.shortest_path(network, from, to)
        }
    }

    fn sluggish(delay: Duration) -> (GraphEngine<SluggishFinder>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let finder = SluggishFinder { delay, calls: Arc::clone(&calls) };
        (GraphEngine::with_finder(l_shaped_network(), finder), calls)
    }

    #[tokio::test]
    async fn slow_search_is_cut_off_by_the_timeout() {
        let (engine, _) = sluggish(Duration::from_millis(300));
        let mut adapter = RouteAdapter::new(engine, Duration::from_millis(10));

        let started = Instant::now();
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert!(started.elapsed() < Duration::from_millis(250), "took {:?}", started.elapsed());
        assert!(matches!(adapter.accept(c), Some(Err(RoutingError::EngineUnavailable(_)))));
    }

    #[tokio::test]
    async fn slow_search_within_the_timeout_succeeds() {
        let (engine, _) = sluggish(Duration::from_millis(20));
        let mut adapter = RouteAdapter::new(engine, Duration::from_secs(5));
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        let route = adapter.accept(c).unwrap().unwrap();
        assert_eq!(route.distance_m, 2000.0);
    }

    #[tokio::test]
    async fn superseded_search_never_starts() {
        let (engine, calls) = sluggish(Duration::from_millis(300));
        let mut adapter = RouteAdapter::new(engine, Duration::from_secs(5));

        let first = adapter.compute_route(Some(A), Some(B));
        adapter.cancel();

        let started = Instant::now();
        let c = first.run().await;
        assert!(c.is_cancelled());
        assert!(started.elapsed() < Duration::from_millis(250));
        assert!(adapter.accept(c).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

// ── Adapter ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod adapter {
    use std::time::Duration;

    use fm_core::GeoPoint;

    use super::helpers::{two_step_route, CountingEngine, FixedEngine, SlowEngine, StuckEngine, A, B, TIMEOUT};
    use crate::{EngineError, RouteAdapter, RoutingError};

    #[tokio::test]
    async fn success_is_accepted_once() {
        let (engine, calls) = FixedEngine::ok(two_step_route());
        let mut adapter = RouteAdapter::new(engine, TIMEOUT);

        let completion = adapter.compute_route(Some(A), Some(B)).run().await;
        assert!(adapter.is_in_flight());

        let result = adapter.accept(completion.clone()).unwrap().unwrap();
        assert_eq!(result.distance_m, 2400.0);
        assert_eq!(*calls.lock().unwrap(), vec![(A, B)]);
        assert!(!adapter.is_in_flight());

        assert!(adapter.accept(completion).is_none(), "second accept must be ignored");
    }

    #[tokio::test]
    async fn engine_failures_are_mapped() {
        let (engine, _) = FixedEngine::with(Err(EngineError::NoPath("river".into())));
        let mut adapter = RouteAdapter::new(engine, TIMEOUT);
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert_eq!(adapter.accept(c), Some(Err(RoutingError::NoRouteFound)));

        let (engine, _) = FixedEngine::with(Err(EngineError::Unavailable("503".into())));
        let mut adapter = RouteAdapter::new(engine, TIMEOUT);
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert_eq!(adapter.accept(c), Some(Err(RoutingError::EngineUnavailable("503".into()))));
    }

    #[tokio::test]
    async fn missing_or_invalid_coordinates_skip_the_engine() {
        let (engine, calls) = FixedEngine::ok(two_step_route());
        let mut adapter = RouteAdapter::new(engine, TIMEOUT);

        for (from, to) in [
            (None, Some(B)),
            (Some(A), None),
            (Some(GeoPoint::new(f64::NAN, 98.0)), Some(B)),
            (Some(A), Some(GeoPoint::new(3.0, 200.0))),
        ] {
            let c = adapter.compute_route(from, to).run().await;
            assert_eq!(adapter.accept(c), Some(Err(RoutingError::InvalidCoordinates)));
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_synthesizes_engine_unavailable() {
        let mut adapter = RouteAdapter::new(SlowEngine { delay: Duration::from_secs(60) }, TIMEOUT);
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert!(matches!(adapter.accept(c), Some(Err(RoutingError::EngineUnavailable(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_answer_within_timeout_is_kept() {
        let mut adapter = RouteAdapter::new(SlowEngine { delay: Duration::from_secs(3) }, TIMEOUT);
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert!(matches!(adapter.accept(c), Some(Ok(_))));
    }

    #[tokio::test]
    async fn superseded_request_is_cancelled_and_dropped() {
        let mut adapter = RouteAdapter::new(StuckEngine, TIMEOUT);
        let first = adapter.compute_route(Some(A), Some(B));
        let _second = adapter.compute_route(Some(B), Some(A));

        // The first request's token was cancelled, so running it returns
        // immediately even though the engine never answers.
        let c = first.run().await;
        assert!(c.is_cancelled());
        assert!(adapter.accept(c).is_none());
        assert!(adapter.is_in_flight(), "the second request is still outstanding");
    }

    #[tokio::test]
    async fn cancel_rejects_finished_but_unapplied_result() {
        let (engine, _) = FixedEngine::ok(two_step_route());
        let mut adapter = RouteAdapter::new(engine, TIMEOUT);
        let c = adapter.compute_route(Some(A), Some(B)).run().await;
        assert!(!c.is_cancelled());

        let before = adapter.generation();
        adapter.cancel();
        assert!(adapter.generation() > before);
        assert!(!adapter.is_in_flight());
        assert!(adapter.accept(c).is_none());
    }

    #[tokio::test]
    async fn cancel_without_request_is_a_no_op() {
        let mut adapter = RouteAdapter::new(CountingEngine::default(), TIMEOUT);
        adapter.cancel();
        assert_eq!(adapter.generation(), 0);
    }

    #[tokio::test]
    async fn late_success_of_old_request_loses_to_newer_one() {
        let mut adapter = RouteAdapter::new(CountingEngine::default(), TIMEOUT);

        let old = adapter.compute_route(Some(A), Some(B)).run().await;
        let new = adapter.compute_route(Some(B), Some(A)).run().await;

        // Deliver the newer completion first, then the stale one.
        let applied = adapter.accept(new).unwrap().unwrap();
        assert_eq!(applied.distance_m, 2.0);
        assert!(adapter.accept(old).is_none());
    }
}

// ── Property: only the last-issued computation is ever applied ────────────────

#[cfg(test)]
mod overlap_property {
    use proptest::prelude::*;

    use super::helpers::{CountingEngine, A, B, TIMEOUT};
    use crate::{RouteAdapter, RouteCompletion};

    fn order(max: usize) -> impl Strategy<Value = Vec<usize>> {
        (1..=max).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        #[test]
        fn only_last_issued_applies(order in order(8)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();

            let n = order.len();
            let mut adapter = RouteAdapter::new(CountingEngine::default(), TIMEOUT);

            // Every request runs to completion before the next one is
            // issued, so all of them hold a successful engine answer.
            let completions: Vec<RouteCompletion> = (0..n)
                .map(|_| rt.block_on(adapter.compute_route(Some(A), Some(B)).run()))
                .collect();

            let mut applied = Vec::new();
            for &i in &order {
                if let Some(result) = adapter.accept(completions[i].clone()) {
                    applied.push(result.unwrap().distance_m);
                }
            }

            prop_assert_eq!(applied, vec![n as f64]);
            prop_assert!(!adapter.is_in_flight());
        }
    }
}

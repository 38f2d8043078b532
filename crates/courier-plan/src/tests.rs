//! Unit tests for the tour-computing engine.
//!
//! All fixtures are hand-crafted road graphs; distances are chosen so that
//! at the default 15 km/h (250 m/min) travel times come out in round
//! minutes where a test asserts exact clock values.

#[cfg(test)]
mod helpers {
    use courier_core::{GeoPoint, NodeId, TourConfig};
    use courier_graph::{RoadGraph, RoadGraphBuilder};

    pub fn config() -> TourConfig {
        TourConfig::default()
    }

    /// Depot and one delivery node, 1 km apart, connected both ways.
    /// 1 km at 15 km/h = 4 min of travel.
    pub fn out_and_back() -> (RoadGraph, NodeId, NodeId) {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(w, a, 1_000.0);
        b.add_segment(a, w, 1_000.0);
        (b.build().unwrap(), w, a)
    }

    /// Depot W plus deliveries P and Q with asymmetric one-way lengths:
    ///
    ///   W→P 100   P→W 100   W→Q 120   Q→W 500   P→Q 500   Q→P 100
    ///
    /// Best cycle:  W→Q→P→W = 120 + 100 + 100 = 320 m.
    /// Greedy (nearest-first from W) takes P first:
    ///   W→P→Q→W = 100 + 220 (P→W→Q) + 200 (Q→P→W) = 520 m.
    pub fn asymmetric_triangle() -> (RoadGraph, NodeId, NodeId, NodeId) {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let p = b.add_node(GeoPoint::new(0.0, 0.001));
        let q = b.add_node(GeoPoint::new(0.001, 0.0));
        b.add_segment(w, p, 100.0);
        b.add_segment(p, w, 100.0);
        b.add_segment(w, q, 120.0);
        b.add_segment(q, w, 500.0);
        b.add_segment(p, q, 500.0);
        b.add_segment(q, p, 100.0);
        (b.build().unwrap(), w, p, q)
    }
}

// ── Shortest-path index ───────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use courier_core::GeoPoint;
    use courier_graph::{DijkstraRouter, RoadGraphBuilder};

    use crate::{DeliveryRequest, ShortestPathGraph};
    use super::helpers::config;

    /// Depot + two deliveries, all pairwise connected both ways (100 m).
    /// Windows: A at 08:00, B at 10:00.
    fn two_window_index(parallel: bool) -> (ShortestPathGraph, [courier_core::NodeId; 3]) {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.001));
        let n = b.add_node(GeoPoint::new(0.001, 0.0));
        for (x, y) in [(w, a), (w, n), (a, n)] {
            b.add_segment(x, y, 100.0);
            b.add_segment(y, x, 100.0);
        }
        let graph = b.build().unwrap();

        let deliveries = vec![DeliveryRequest::new(a, 8), DeliveryRequest::new(n, 10)];
        let sp = if parallel {
            ShortestPathGraph::build_parallel(&graph, &DijkstraRouter, w, &deliveries, &config())
        } else {
            ShortestPathGraph::build(&graph, &DijkstraRouter, w, &deliveries, &config())
        };
        (sp, [w, a, n])
    }

    #[test]
    fn stops_keep_snapshot_order_with_depot_first() {
        let (sp, [w, a, n]) = two_window_index(false);
        let stops = sp.stops();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].node, w);
        assert_eq!(stops[0].window.hour, 8); // departure hour
        assert_eq!(stops[1].node, a);
        assert_eq!(stops[2].node, n);
        assert_eq!(sp.delivery_count(), 2);
    }

    #[test]
    fn domination_prunes_elapsed_target() {
        let (sp, [w, a, n]) = two_window_index(false);

        // Forward in window order: admitted.
        assert!(sp.edge(a, n).is_some());
        // Backward: B's source window (10) has outlived A's (8) — pruned.
        assert!(sp.edge(n, a).is_none());
        // The depot is exempt as a target even from late sources.
        assert!(sp.edge(n, w).is_some());
        assert!(sp.edge(a, w).is_some());
    }

    #[test]
    fn edges_store_concrete_paths_and_lengths() {
        let (sp, [w, a, _]) = two_window_index(false);
        let e = sp.edge(w, a).unwrap();
        assert_eq!(e.length_cm, 10_000);
        assert_eq!(e.path, vec![w, a]);
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let (seq, [w, a, n]) = two_window_index(false);
        let (par, _) = two_window_index(true);

        assert_eq!(seq.edge_count(), par.edge_count());
        for from in [w, a, n] {
            for to in [w, a, n] {
                match (seq.edge(from, to), par.edge(from, to)) {
                    (None, None) => {}
                    (Some(s), Some(p)) => {
                        assert_eq!(s.length_cm, p.length_cm);
                        assert_eq!(s.path, p.path);
                    }
                    other => panic!("edge {from}→{to} differs: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn unreachable_pair_has_no_edge() {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let u = b.add_node(GeoPoint::new(1.0, 1.0)); // no segments at all
        let graph = b.build().unwrap();

        let deliveries = vec![DeliveryRequest::new(u, 8)];
        let sp = ShortestPathGraph::build(&graph, &DijkstraRouter, w, &deliveries, &config());
        assert!(sp.edge(w, u).is_none());
        assert!(sp.edge(u, w).is_none());
    }
}

// ── Feasibility clock ─────────────────────────────────────────────────────────

#[cfg(test)]
mod clock {
    use courier_core::GeoPoint;
    use courier_graph::{DijkstraRouter, RoadGraphBuilder};

    use crate::{simulate, DeliveryRequest, ShortestPathGraph};
    use super::helpers::{config, out_and_back};

    fn index_for(window_hour: u32) -> ShortestPathGraph {
        let (graph, w, a) = out_and_back();
        ShortestPathGraph::build(
            &graph,
            &DijkstraRouter,
            w,
            &[DeliveryRequest::new(a, window_hour)],
            &config(),
        )
    }

    #[test]
    fn serves_on_arrival_inside_window() {
        let sp = index_for(8);
        let s = simulate(&[0, 1], &sp, &config()).unwrap();
        // Depart 08:00, 4 min of travel → service starts 08:04.
        assert_eq!(s.visit_min, vec![484.0]);
        // Out and back: 2 km.
        assert_eq!(s.length_cm, 200_000);
    }

    #[test]
    fn early_arrival_waits_for_window_start() {
        let sp = index_for(9);
        let s = simulate(&[0, 1], &sp, &config()).unwrap();
        // Arrives 08:04, window opens 09:00 → waits, serves exactly at start.
        assert_eq!(s.visit_min, vec![540.0]);
    }

    #[test]
    fn late_arrival_is_infeasible() {
        // 20 km at 15 km/h = 80 min → arrival 09:20, after the 08:00
        // window closed at 09:00.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.2));
        b.add_segment(w, a, 20_000.0);
        b.add_segment(a, w, 20_000.0);
        let graph = b.build().unwrap();

        let sp = ShortestPathGraph::build(
            &graph, &DijkstraRouter, w, &[DeliveryRequest::new(a, 8)], &config(),
        );
        assert!(sp.edge(w, a).is_some());
        assert!(simulate(&[0, 1], &sp, &config()).is_none());
    }

    #[test]
    fn arrival_exactly_at_window_end_is_served() {
        // 15 km at 15 km/h = 60 min → arrival exactly 09:00, the end of the
        // 08:00 window.  The boundary is inclusive.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.15));
        b.add_segment(w, a, 15_000.0);
        b.add_segment(a, w, 15_000.0);
        let graph = b.build().unwrap();

        let sp = ShortestPathGraph::build(
            &graph, &DijkstraRouter, w, &[DeliveryRequest::new(a, 8)], &config(),
        );
        let s = simulate(&[0, 1], &sp, &config()).unwrap();
        assert_eq!(s.visit_min, vec![540.0]);
    }

    #[test]
    fn missing_closing_edge_is_infeasible() {
        // One-way out, no way back: the outbound hop works but the cycle
        // cannot close.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.01));
        b.add_segment(w, a, 1_000.0);
        let graph = b.build().unwrap();

        let sp = ShortestPathGraph::build(
            &graph, &DijkstraRouter, w, &[DeliveryRequest::new(a, 8)], &config(),
        );
        assert!(sp.edge(w, a).is_some());
        assert!(simulate(&[0, 1], &sp, &config()).is_none());
    }
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod optimizer {
    use courier_core::{GeoPoint, TourConfig};
    use courier_graph::{DijkstraRouter, RoadGraphBuilder};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::optimizer::{solve, solve_exact, solve_exact_parallel, solve_greedy};
    use crate::{DeliveryRequest, ShortestPathGraph};
    use super::helpers::{asymmetric_triangle, config};

    fn triangle_index() -> ShortestPathGraph {
        let (graph, w, p, q) = asymmetric_triangle();
        ShortestPathGraph::build(
            &graph,
            &DijkstraRouter,
            w,
            &[DeliveryRequest::new(p, 8), DeliveryRequest::new(q, 8)],
            &config(),
        )
    }

    #[test]
    fn exact_finds_minimal_cycle() {
        let sp = triangle_index();
        let (order, schedule) = solve_exact(&sp, &config()).unwrap();
        // W→Q→P→W, 320 m.  Q is stop 2, P is stop 1.
        assert_eq!(order, vec![0, 2, 1]);
        assert_eq!(schedule.length_cm, 32_000);
    }

    #[test]
    fn parallel_exact_matches_sequential() {
        let sp = triangle_index();
        assert_eq!(
            solve_exact(&sp, &config()),
            solve_exact_parallel(&sp, &config()),
        );
    }

    #[test]
    fn equal_length_ties_go_to_enumeration_order() {
        // Fully symmetric 100 m triangle: both cycles are 300 m, so the
        // first permutation enumerated — stops in snapshot order — wins.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.001));
        let c = b.add_node(GeoPoint::new(0.001, 0.0));
        for (x, y) in [(w, a), (w, c), (a, c)] {
            b.add_segment(x, y, 100.0);
            b.add_segment(y, x, 100.0);
        }
        let graph = b.build().unwrap();
        let sp = ShortestPathGraph::build(
            &graph,
            &DijkstraRouter,
            w,
            &[DeliveryRequest::new(a, 8), DeliveryRequest::new(c, 8)],
            &config(),
        );

        let (order_seq, _) = solve_exact(&sp, &config()).unwrap();
        let (order_par, _) = solve_exact_parallel(&sp, &config()).unwrap();
        assert_eq!(order_seq, vec![0, 1, 2]);
        assert_eq!(order_par, vec![0, 1, 2]);
    }

    #[test]
    fn greedy_takes_nearest_first_and_may_be_suboptimal() {
        let sp = triangle_index();
        let (order, schedule) = solve_greedy(&sp, &config()).unwrap();
        // Nearest from W is P (100 m < 120 m), forcing the 520 m cycle.
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(schedule.length_cm, 52_000);
    }

    #[test]
    fn above_limit_dispatches_to_greedy() {
        let sp = triangle_index();
        let cfg = TourConfig { exact_search_limit: 1, ..config() };
        // D = 2 > 1 → greedy runs and returns its (suboptimal) cycle.
        let (_, greedy) = solve(&sp, &cfg).unwrap();
        assert_eq!(greedy.length_cm, 52_000);
        // At or below the limit the exact optimum is found instead.
        let (_, exact) = solve(&sp, &config()).unwrap();
        assert_eq!(exact.length_cm, 32_000);
    }

    #[test]
    fn greedy_dead_end_is_infeasible_not_a_crash() {
        // Delivery with no road at all: the first greedy step has no
        // admissible candidate.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let u = b.add_node(GeoPoint::new(1.0, 1.0));
        let graph = b.build().unwrap();
        let sp = ShortestPathGraph::build(
            &graph, &DijkstraRouter, w, &[DeliveryRequest::new(u, 8)], &config(),
        );
        assert!(solve_greedy(&sp, &config()).is_none());
    }

    #[test]
    fn no_feasible_order_yields_none() {
        let sp = triangle_index();
        // Depart so late that every window has already closed.
        let cfg = TourConfig { depart_time_min: 10.0 * 60.0, ..config() };
        assert!(solve_exact(&sp, &cfg).is_none());
        assert!(solve_exact_parallel(&sp, &cfg).is_none());
    }

    // ── Randomized sequential/parallel equivalence ────────────────────────

    /// Complete digraph on depot + 6 deliveries with independent random
    /// lengths per direction and random windows in 08:00–10:00.
    fn random_index(seed: u64) -> ShortestPathGraph {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut b = RoadGraphBuilder::new();
        let nodes: Vec<_> = (0..7)
            .map(|i| b.add_node(GeoPoint::new(i as f32 * 0.01, 0.0)))
            .collect();
        for &x in &nodes {
            for &y in &nodes {
                if x != y {
                    b.add_segment(x, y, rng.gen_range(100.0..2_000.0));
                }
            }
        }
        let graph = b.build().unwrap();

        let mut deliveries = Vec::new();
        for &node in &nodes[1..] {
            deliveries.push(DeliveryRequest { node, window: courier_core::TimeWindow::new(rng.gen_range(8..11)) });
        }
        ShortestPathGraph::build(&graph, &DijkstraRouter, nodes[0], &deliveries, &config())
    }

    #[test]
    fn exact_and_parallel_agree_on_random_instances() {
        for seed in 0..8 {
            let sp = random_index(seed);
            let seq = solve_exact(&sp, &config());
            let par = solve_exact_parallel(&sp, &config());
            assert_eq!(seq, par, "divergence at seed {seed}");
        }
    }

    #[test]
    fn solver_is_idempotent() {
        let sp = random_index(3);
        assert_eq!(solve(&sp, &config()), solve(&sp, &config()));
    }
}

// ── Permutation enumeration ───────────────────────────────────────────────────

#[cfg(test)]
mod permutations {
    use crate::optimizer::{all_permutations, next_permutation};

    #[test]
    fn lexicographic_order_of_three() {
        assert_eq!(
            all_permutations(3),
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn counts_are_factorial() {
        assert_eq!(all_permutations(1).len(), 1);
        assert_eq!(all_permutations(4).len(), 24);
        assert_eq!(all_permutations(6).len(), 720);
    }

    #[test]
    fn single_element_has_no_successor() {
        let mut p = vec![1];
        assert!(!next_permutation(&mut p));
    }
}

// ── Route assembly ────────────────────────────────────────────────────────────

#[cfg(test)]
mod assemble {
    use courier_core::GeoPoint;
    use courier_graph::{DijkstraRouter, RoadGraphBuilder};

    use crate::assemble::assemble_route;
    use crate::{DeliveryRequest, ShortestPathGraph};
    use super::helpers::config;

    #[test]
    fn stitches_segments_without_duplicated_junctions() {
        // W — A — M — B — W ring; M is a plain intersection, not a stop.
        // The A—M leg is slightly short so the A→B shortest path runs
        // through M rather than back through the depot.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.001));
        let m = b.add_node(GeoPoint::new(0.001, 0.001));
        let bb = b.add_node(GeoPoint::new(0.001, 0.0));
        for (x, y, len) in [(w, a, 100.0), (a, m, 90.0), (m, bb, 100.0), (bb, w, 100.0)] {
            b.add_segment(x, y, len);
            b.add_segment(y, x, len);
        }
        let graph = b.build().unwrap();

        let sp = ShortestPathGraph::build(
            &graph,
            &DijkstraRouter,
            w,
            &[DeliveryRequest::new(a, 8), DeliveryRequest::new(bb, 8)],
            &config(),
        );

        let route = assemble_route(&[0, 1, 2], &sp).unwrap();
        // Each stop appears once; the pass-through junction M appears where
        // the A→B path crosses it; the walk closes at the depot.
        assert_eq!(route, vec![w, a, m, bb, w]);
    }
}

// ── Full pipeline scenarios ───────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use courier_core::{CourierId, GeoPoint, TourConfig};
    use courier_graph::{DijkstraRouter, RoadGraphBuilder};

    use crate::{plan_tour, ComputedTour, DeliveryRequest, TourRequest};
    use super::helpers::{config, out_and_back};

    fn request_with(deliveries: &[DeliveryRequest]) -> TourRequest {
        let mut r = TourRequest::new(CourierId(0));
        for &d in deliveries {
            r.add(d);
        }
        r
    }

    #[test]
    fn single_delivery_out_and_back() {
        let (graph, w, a) = out_and_back();
        let request = request_with(&[DeliveryRequest::new(a, 8)]);

        let tour = plan_tour(&graph, &DijkstraRouter, w, &request, &config()).unwrap();
        assert_eq!(tour.route, vec![w, a, w]);
        assert_eq!(tour.deliveries.len(), 1);
        assert_eq!(tour.deliveries[0].node, a);
        assert_eq!(tour.deliveries[0].time_min, 484.0);
        assert_eq!(tour.deliveries[0].clock_time().to_string(), "08:04");
        assert_eq!(tour.length_m(), 2_000.0);
    }

    #[test]
    fn conflicting_windows_are_infeasible() {
        // A is 100 m out; B sits 50 km beyond A (200 min of travel), and
        // both promise the 08:00 window — no order can serve both in time.
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.001));
        let far = b.add_node(GeoPoint::new(0.5, 0.0));
        for (x, y, len) in [(w, a, 100.0), (a, far, 50_000.0)] {
            b.add_segment(x, y, len);
            b.add_segment(y, x, len);
        }
        let graph = b.build().unwrap();

        let request = request_with(&[
            DeliveryRequest::new(a, 8),
            DeliveryRequest::new(far, 8),
        ]);
        assert!(plan_tour(&graph, &DijkstraRouter, w, &request, &config()).is_none());
    }

    #[test]
    fn unreachable_delivery_is_infeasible_not_a_crash() {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let a = b.add_node(GeoPoint::new(0.0, 0.001));
        let island = b.add_node(GeoPoint::new(2.0, 2.0)); // disconnected
        b.add_segment(w, a, 100.0);
        b.add_segment(a, w, 100.0);
        let graph = b.build().unwrap();

        let request = request_with(&[
            DeliveryRequest::new(a, 8),
            DeliveryRequest::new(island, 9),
        ]);
        assert!(plan_tour(&graph, &DijkstraRouter, w, &request, &config()).is_none());
    }

    #[test]
    fn empty_request_yields_trivial_depot_tour() {
        let (graph, w, _) = out_and_back();
        let request = TourRequest::new(CourierId(0));
        let tour = plan_tour(&graph, &DijkstraRouter, w, &request, &config()).unwrap();
        assert_eq!(tour, ComputedTour::trivial(w));
        assert_eq!(tour.route, vec![w]);
        assert!(tour.deliveries.is_empty());
    }

    #[test]
    fn duplicate_requests_at_one_node_collapse() {
        let (graph, w, a) = out_and_back();
        let mut request = TourRequest::new(CourierId(0));
        request.add(DeliveryRequest::new(a, 9));
        let replaced = request.add(DeliveryRequest::new(a, 8));
        assert_eq!(replaced, Some(DeliveryRequest::new(a, 9)));
        assert_eq!(request.len(), 1);

        let tour = plan_tour(&graph, &DijkstraRouter, w, &request, &config()).unwrap();
        assert_eq!(tour.deliveries.len(), 1);
        assert_eq!(tour.deliveries[0].time_min, 484.0); // 08:00 window kept
    }

    #[test]
    fn plan_is_idempotent() {
        let (graph, w, a) = out_and_back();
        let request = request_with(&[DeliveryRequest::new(a, 8)]);
        let first  = plan_tour(&graph, &DijkstraRouter, w, &request, &config());
        let second = plan_tour(&graph, &DijkstraRouter, w, &request, &config());
        assert_eq!(first, second);
    }

    /// A 12-delivery ring: above every sensible exact limit, so the greedy
    /// path runs — and finishes immediately, which 12! enumeration would
    /// not.  Checks the schedule invariants on the result.
    #[test]
    fn large_instance_runs_greedy_and_respects_windows() {
        let mut b = RoadGraphBuilder::new();
        let w = b.add_node(GeoPoint::new(0.0, 0.0));
        let ring: Vec<_> = (1..=12)
            .map(|i| b.add_node(GeoPoint::new(i as f32 * 0.001, 0.0)))
            .collect();

        // 250 m (1 min) hops around the ring, both directions.
        let mut prev = w;
        for &node in &ring {
            b.add_segment(prev, node, 250.0);
            b.add_segment(node, prev, 250.0);
            prev = node;
        }
        b.add_segment(prev, w, 250.0);
        b.add_segment(w, prev, 250.0);
        let graph = b.build().unwrap();

        // First eight stops in the 08:00 window, the last four at 09:00.
        let mut request = TourRequest::new(CourierId(0));
        for (i, &node) in ring.iter().enumerate() {
            request.add(DeliveryRequest::new(node, if i < 8 { 8 } else { 9 }));
        }

        let config = TourConfig::default();
        assert!(request.len() > config.exact_search_limit);

        let tour = plan_tour(&graph, &DijkstraRouter, w, &request, &config).unwrap();
        assert_eq!(tour.deliveries.len(), 12);

        // Visit times never decrease and always land inside the window.
        let mut last = config.depart_time_min;
        for delivery in &tour.deliveries {
            assert!(delivery.time_min >= last, "visit times must not decrease");
            last = delivery.time_min;
        }
        for (i, delivery) in tour.deliveries.iter().enumerate() {
            let hour = if i < 8 { 8 } else { 9 };
            let start = hour as f64 * 60.0;
            assert!(
                delivery.time_min >= start
                    && delivery.time_min <= start + config.window_size_min,
                "delivery {i} at {} outside its window",
                delivery.time_min,
            );
        }

        // The walk is closed at the depot.
        assert_eq!(tour.route.first(), Some(&w));
        assert_eq!(tour.route.last(), Some(&w));
    }
}

//! Shortest-path index over the depot and one courier's delivery nodes.
//!
//! # What it holds
//!
//! The full road graph is far too large to search permutations over, so the
//! planner first reduces it: one stop per delivery (plus the depot, always
//! stop 0), and one [`PathEdge`] per ordered stop pair that could appear in
//! a feasible tour.  Every edge stores the concrete road-node path so the
//! winning cycle can be expanded into a drivable route without re-running
//! any search.
//!
//! # Window domination pruning
//!
//! A pair `source → target` is skipped outright when the target's window has
//! fully elapsed by the source's (`target.hour + 1 <= source.hour`): a
//! courier standing at `source` inside its window can never reach `target`
//! in time, so the edge could only ever belong to infeasible tours.  The
//! depot is exempt as a target — it is only ever the closing hop and has no
//! window to miss.  This deliberately also discards out-of-hour-order visits
//! that a wider search might exploit; the pruning is load-bearing for the
//! O(D²) query count and the permutation search's branch factor.
//!
//! # Cost
//!
//! O(D²) shortest-path queries, each O(E log V).  The parallel build
//! partitions the outer (source) loop across Rayon workers against the
//! shared read-only road graph and unions the per-chunk edge sets — edges
//! are produced independently per pair, so a plain union is exact.

use rustc_hash::FxHashMap;

use courier_core::{NodeId, TimeWindow, TourConfig};
use courier_graph::{RoadGraph, Router};

use crate::request::DeliveryRequest;

// ── Stop / PathEdge ───────────────────────────────────────────────────────────

/// One entry of the reduced graph: a road node plus its delivery window.
///
/// Stop 0 is always the depot; it carries the departure hour as its window
/// so the domination rule can treat it like any other source.
#[derive(Copy, Clone, Debug)]
pub struct Stop {
    pub node:   NodeId,
    pub window: TimeWindow,
}

/// Precomputed shortest path between two stops.
#[derive(Clone, Debug)]
pub struct PathEdge {
    /// Total road distance in centimetres.
    pub length_cm: u64,
    /// Road nodes from source to target inclusive.
    pub path: Vec<NodeId>,
}

// ── ShortestPathGraph ─────────────────────────────────────────────────────────

/// The reduced, window-pruned complete-ish digraph the optimizer works on.
///
/// Built fresh per optimization call and owned exclusively by it; read-only
/// once built, so the exact search may share it across worker threads.
pub struct ShortestPathGraph {
    stops: Vec<Stop>,
    edges: FxHashMap<(NodeId, NodeId), PathEdge>,
}

impl ShortestPathGraph {
    /// Build the index sequentially.
    pub fn build<R: Router>(
        graph:      &RoadGraph,
        router:     &R,
        depot:      NodeId,
        deliveries: &[DeliveryRequest],
        config:     &TourConfig,
    ) -> Self {
        let stops = make_stops(depot, deliveries, config);

        let mut edges = FxHashMap::default();
        for source in 0..stops.len() {
            edges.extend(edges_from_source(graph, router, &stops, source));
        }

        Self { stops, edges }
    }

    /// Build the index with the source loop split across Rayon workers.
    ///
    /// Produces exactly the same graph as [`build`](Self::build): each
    /// worker reads the shared road graph and emits its sources' edges, and
    /// the per-chunk edge sets are disjoint, so their union is the full set.
    pub fn build_parallel<R: Router>(
        graph:      &RoadGraph,
        router:     &R,
        depot:      NodeId,
        deliveries: &[DeliveryRequest],
        config:     &TourConfig,
    ) -> Self {
        use rayon::prelude::*;

        let stops = make_stops(depot, deliveries, config);

        let sources: Vec<usize> = (0..stops.len()).collect();
        let chunk_size = sources.len().div_ceil(rayon::current_num_threads()).max(1);

        let chunks: Vec<Vec<((NodeId, NodeId), PathEdge)>> = sources
            .par_chunks(chunk_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .flat_map(|&source| edges_from_source(graph, router, &stops, source))
                    .collect()
            })
            .collect();

        let edges = chunks.into_iter().flatten().collect();
        Self { stops, edges }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// All stops; index 0 is the depot, the rest follow snapshot order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Number of delivery stops (excludes the depot).
    pub fn delivery_count(&self) -> usize {
        self.stops.len() - 1
    }

    pub fn depot(&self) -> NodeId {
        self.stops[0].node
    }

    /// Look up the precomputed edge `from → to`, if it was admitted.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&PathEdge> {
        self.edges.get(&(from, to))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn make_stops(depot: NodeId, deliveries: &[DeliveryRequest], config: &TourConfig) -> Vec<Stop> {
    let mut stops = Vec::with_capacity(deliveries.len() + 1);
    stops.push(Stop { node: depot, window: config.depart_window() });
    stops.extend(deliveries.iter().map(|d| Stop { node: d.node, window: d.window }));
    stops
}

/// All admitted, routable edges out of `stops[source]`.
fn edges_from_source<R: Router>(
    graph:  &RoadGraph,
    router: &R,
    stops:  &[Stop],
    source: usize,
) -> Vec<((NodeId, NodeId), PathEdge)> {
    let src = stops[source];
    let mut out = Vec::new();

    for (target, tgt) in stops.iter().enumerate() {
        if target == source {
            continue;
        }
        // Window domination: a fully elapsed target can never follow this
        // source.  The depot (stop 0) is exempt — closing hop only.
        if target != 0 && tgt.window.elapsed_before(src.window) {
            continue;
        }
        // Unroutable pairs simply have no edge.
        if let Ok(p) = router.shortest_path(graph, src.node, tgt.node) {
            out.push((
                (src.node, tgt.node),
                PathEdge { length_cm: p.length_cm, path: p.nodes },
            ));
        }
    }

    out
}

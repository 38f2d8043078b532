//! The per-courier planning pipeline and its result types.

use courier_core::{ClockTime, NodeId, TourConfig};
use courier_graph::{RoadGraph, Router};

use crate::index::ShortestPathGraph;
use crate::request::{DeliveryRequest, TourRequest};
use crate::{assemble, optimizer};

// ── TimedDelivery / ComputedTour ──────────────────────────────────────────────

/// One served delivery with its computed visit time.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedDelivery {
    pub node: NodeId,
    /// Minutes after midnight at which service starts.
    pub time_min: f64,
}

impl TimedDelivery {
    /// Wall-clock rendering of the visit time.
    pub fn clock_time(&self) -> ClockTime {
        ClockTime::from_minutes(self.time_min)
    }
}

/// A successfully computed tour: the physical route plus the timed
/// deliveries, in visiting order.
///
/// The route is a closed walk — it starts and ends at the depot — and every
/// requested delivery node appears exactly once in `deliveries` (the depot
/// has no entry).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputedTour {
    /// Every road node driven through, in order, depot to depot.
    pub route: Vec<NodeId>,

    /// The deliveries in visiting order with their service start times.
    pub deliveries: Vec<TimedDelivery>,

    /// Total driven distance in centimetres.
    pub length_cm: u64,
}

impl ComputedTour {
    /// The no-delivery tour: the courier never leaves the depot.
    pub fn trivial(depot: NodeId) -> Self {
        Self { route: vec![depot], deliveries: Vec::new(), length_cm: 0 }
    }

    /// Total driven distance in metres.
    pub fn length_m(&self) -> f64 {
        self.length_cm as f64 / 100.0
    }
}

// ── plan_tour ─────────────────────────────────────────────────────────────────

/// Compute one courier's tour.
///
/// Pipeline: snapshot the request, build the shortest-path index (Rayon
/// over sources), search for the best feasible order, stitch the route.
/// Returns `None` when no ordering satisfies every delivery window — an
/// expected outcome the caller surfaces to the user, not an error.
///
/// A request with no deliveries yields the trivial depot-only tour without
/// touching the solver.
pub fn plan_tour<R: Router>(
    graph:   &RoadGraph,
    router:  &R,
    depot:   NodeId,
    request: &TourRequest,
    config:  &TourConfig,
) -> Option<ComputedTour> {
    if request.is_empty() {
        return Some(ComputedTour::trivial(depot));
    }

    let deliveries: Vec<DeliveryRequest> = request.deliveries().copied().collect();
    let sp = ShortestPathGraph::build_parallel(graph, router, depot, &deliveries, config);

    let (order, schedule) = optimizer::solve(&sp, config)?;
    let route = assemble::assemble_route(&order, &sp)?;

    let stops = sp.stops();
    let deliveries = order[1..]
        .iter()
        .zip(&schedule.visit_min)
        .map(|(&stop, &time_min)| TimedDelivery { node: stops[stop].node, time_min })
        .collect();

    Some(ComputedTour { route, deliveries, length_cm: schedule.length_cm })
}

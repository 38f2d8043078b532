//! Feasibility clock — stateless replay of a candidate stop sequence.
//!
//! The one function here is the feasibility oracle for every search
//! strategy: it walks a proposed visiting order, advances a simulated
//! clock hop by hop, and either produces the per-stop schedule or reports
//! the order infeasible.  It holds no state of its own, so it can be
//! called from any number of worker threads against the same index.

use courier_core::TourConfig;

use crate::index::ShortestPathGraph;

// ── TourSchedule ──────────────────────────────────────────────────────────────

/// The timing of a feasible stop sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct TourSchedule {
    /// Total cycle length in centimetres, including the closing hop back to
    /// the depot.
    pub length_cm: u64,

    /// Visit time (minutes after midnight) of each non-depot stop, in
    /// sequence order.  `visit_min[i]` times `order[i + 1]`.
    pub visit_min: Vec<f64>,
}

// ── simulate ──────────────────────────────────────────────────────────────────

/// Replay `order` (stop indices into `sp`, depot first) against the clock.
///
/// For each consecutive pair the edge must exist in the index; arrival is
/// `clock + travel`, and then:
///
/// - arrival before the window opens → the courier waits, serves at the
///   window start;
/// - arrival inside the window → serves on arrival;
/// - arrival after the window closes → the sequence is infeasible.
///
/// Serving adds the configured service time; the recorded visit time is the
/// moment service starts.  The closing hop back to the depot must also be
/// routable but is not window-checked (the depot has no window).
///
/// Returns `None` when the order is infeasible.
pub fn simulate(
    order:  &[usize],
    sp:     &ShortestPathGraph,
    config: &TourConfig,
) -> Option<TourSchedule> {
    let stops = sp.stops();

    let mut clock = config.depart_time_min;
    let mut length_cm: u64 = 0;
    let mut visit_min = Vec::with_capacity(order.len().saturating_sub(1));

    for pair in order.windows(2) {
        let from = stops[pair[0]];
        let to   = stops[pair[1]];

        let edge = sp.edge(from.node, to.node)?;
        length_cm += edge.length_cm;

        let arrival      = clock + config.travel_minutes(edge.length_cm);
        let window_start = to.window.start_min();
        let window_end   = to.window.end_min(config.window_size_min);

        if arrival < window_start {
            // Early: wait for the window to open, then serve.
            clock = window_start + config.service_time_min;
        } else if arrival <= window_end {
            clock = arrival + config.service_time_min;
        } else {
            // Missed the window — this order cannot be driven.
            return None;
        }

        visit_min.push(clock - config.service_time_min);
    }

    // Closing hop back to the depot: must exist, adds length, no window.
    let last  = stops[*order.last()?];
    let first = stops[order[0]];
    let closing = sp.edge(last.node, first.node)?;
    length_cm += closing.length_cm;

    Some(TourSchedule { length_cm, visit_min })
}

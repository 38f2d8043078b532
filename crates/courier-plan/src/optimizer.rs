//! Tour search: exact permutation search, its parallel variant, and the
//! greedy fallback.
//!
//! # Strategy selection
//!
//! [`solve`] picks by instance size against
//! [`TourConfig::exact_search_limit`]: up to the limit the full D!
//! permutation space is enumerated (guaranteed minimal feasible cycle);
//! above it the greedy construction runs instead — factorial enumeration
//! would not finish, so optimality is traded for tractability.
//!
//! # Determinism
//!
//! Permutations are enumerated in lexicographic order and a candidate only
//! replaces the incumbent when strictly shorter, so ties go to the
//! first-found order.  The parallel variant splits the same lexicographic
//! list into contiguous chunks and folds the chunk-local minima in chunk
//! order with the same strict comparison — its result is identical to the
//! sequential search's, just computed on more cores.

use courier_core::TourConfig;

use crate::clock::{self, TourSchedule};
use crate::index::ShortestPathGraph;

/// A visiting order (stop indices, depot first) plus its timing.
pub type SolvedTour = (Vec<usize>, TourSchedule);

// ── Strategy selection ────────────────────────────────────────────────────────

/// Find the best feasible round trip for the index, or `None` if no order
/// satisfies every window.
pub fn solve(sp: &ShortestPathGraph, config: &TourConfig) -> Option<SolvedTour> {
    let d = sp.delivery_count();
    if d == 0 {
        return None;
    }
    if d <= config.exact_search_limit {
        solve_exact_parallel(sp, config)
    } else {
        solve_greedy(sp, config)
    }
}

// ── Exact search ──────────────────────────────────────────────────────────────

/// Enumerate all D! delivery orders and keep the shortest feasible cycle.
pub fn solve_exact(sp: &ShortestPathGraph, config: &TourConfig) -> Option<SolvedTour> {
    let d = sp.delivery_count();
    if d == 0 {
        return None;
    }

    let mut perm: Vec<usize> = (1..=d).collect();
    let mut best: Option<SolvedTour> = None;

    loop {
        consider(&perm, sp, config, &mut best);
        if !next_permutation(&mut perm) {
            break;
        }
    }

    best
}

/// Exact search with the permutation space split across Rayon workers.
///
/// Each contiguous chunk reduces to a local best against the shared
/// read-only index; a chunk with no feasible order contributes nothing.
pub fn solve_exact_parallel(sp: &ShortestPathGraph, config: &TourConfig) -> Option<SolvedTour> {
    use rayon::prelude::*;

    let d = sp.delivery_count();
    if d == 0 {
        return None;
    }

    let perms = all_permutations(d);
    let chunk_size = perms.len().div_ceil(rayon::current_num_threads()).max(1);

    let local_bests: Vec<Option<SolvedTour>> = perms
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut best = None;
            for perm in chunk {
                consider(perm, sp, config, &mut best);
            }
            best
        })
        .collect();

    // Chunk order preserves enumeration order, so the strict fold keeps the
    // same first-found winner as the sequential search.
    let mut best: Option<SolvedTour> = None;
    for candidate in local_bests.into_iter().flatten() {
        if shorter(&candidate, best.as_ref()) {
            best = Some(candidate);
        }
    }
    best
}

/// Evaluate one delivery permutation and update the incumbent if strictly
/// shorter.
fn consider(
    perm:   &[usize],
    sp:     &ShortestPathGraph,
    config: &TourConfig,
    best:   &mut Option<SolvedTour>,
) {
    let mut order = Vec::with_capacity(perm.len() + 1);
    order.push(0);
    order.extend_from_slice(perm);

    if let Some(schedule) = clock::simulate(&order, sp, config) {
        let candidate = (order, schedule);
        if shorter(&candidate, best.as_ref()) {
            *best = Some(candidate);
        }
    }
}

fn shorter(candidate: &SolvedTour, best: Option<&SolvedTour>) -> bool {
    match best {
        None => true,
        Some((_, incumbent)) => candidate.1.length_cm < incumbent.length_cm,
    }
}

// ── Greedy heuristic ──────────────────────────────────────────────────────────

/// Construct one order greedily: take the earliest-window group of
/// unvisited stops and, within it, the nearest stop reachable from the
/// current position; validate and time the result with the clock.
///
/// Heuristic contract only — the result carries no optimality guarantee,
/// and a construction dead end (no admissible candidate at some step) is
/// reported as infeasible even when another order might have worked.
pub fn solve_greedy(sp: &ShortestPathGraph, config: &TourConfig) -> Option<SolvedTour> {
    let stops = sp.stops();

    let mut unvisited: Vec<usize> = (1..stops.len()).collect();
    let mut order = vec![0usize];
    let mut current = 0usize;

    while !unvisited.is_empty() {
        let open_hour = unvisited.iter().map(|&i| stops[i].window.hour).min()?;

        // Nearest member of the earliest-window group with a usable edge
        // from the current position; first-seen wins length ties.
        let mut best: Option<(usize, u64)> = None;
        for (pos, &i) in unvisited.iter().enumerate() {
            if stops[i].window.hour > open_hour {
                continue;
            }
            let Some(edge) = sp.edge(stops[current].node, stops[i].node) else {
                continue;
            };
            if best.is_none_or(|(_, len)| edge.length_cm < len) {
                best = Some((pos, edge.length_cm));
            }
        }

        let (pos, _) = best?; // dead end: no reachable stop in the group
        let next = unvisited.remove(pos);
        order.push(next);
        current = next;
    }

    clock::simulate(&order, sp, config).map(|schedule| (order, schedule))
}

// ── Permutation enumeration ───────────────────────────────────────────────────

/// All permutations of `1..=d` in lexicographic order.
///
/// Materialized (rather than streamed) so the parallel search can chunk the
/// space; `d` is capped by config validation, so the table stays small.
pub(crate) fn all_permutations(d: usize) -> Vec<Vec<usize>> {
    let count: usize = (1..=d).product();
    let mut out = Vec::with_capacity(count);

    let mut perm: Vec<usize> = (1..=d).collect();
    loop {
        out.push(perm.clone());
        if !next_permutation(&mut perm) {
            break;
        }
    }
    out
}

/// Advance `perm` to its lexicographic successor in place.
///
/// Returns `false` when `perm` was already the last permutation.
pub(crate) fn next_permutation(perm: &mut [usize]) -> bool {
    if perm.len() < 2 {
        return false;
    }

    // Longest non-increasing suffix; the element before it is the pivot.
    let mut i = perm.len() - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    // Swap the pivot with the smallest suffix element greater than it, then
    // sort the suffix ascending (it is descending, so reverse).
    let mut j = perm.len() - 1;
    while perm[j] <= perm[i - 1] {
        j -= 1;
    }
    perm.swap(i - 1, j);
    perm[i..].reverse();
    true
}

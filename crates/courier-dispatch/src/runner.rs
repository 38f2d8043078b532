//! The batch runner: one tour per courier, computed in parallel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use courier_core::{CourierId, NodeId, TourConfig};
use courier_graph::{RoadGraph, Router};
use courier_plan::{plan_tour, TourRequest};

use crate::{DispatchError, DispatchObserver, DispatchResult, TourOutcome};

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Cooperative cancellation flag shared between a batch and its initiator.
///
/// Cloning is cheap (one `Arc`).  Cancelling does not interrupt in-flight
/// tours — couriers already being computed run to completion — but a run
/// whose token was cancelled discards everything instead of returning a
/// superseded answer.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the batch as superseded.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ── DispatchRunner ────────────────────────────────────────────────────────────

/// Plans batches of tours against one shared road graph.
///
/// The graph is borrowed read-only for the runner's lifetime and shared by
/// reference across all workers — no per-worker copies.  `R` picks the
/// routing algorithm, exactly as in the shortest-path index.
pub struct DispatchRunner<'a, R: Router> {
    graph:  &'a RoadGraph,
    router: R,
    depot:  NodeId,
    config: TourConfig,
    pool:   Option<rayon::ThreadPool>,
}

impl<'a, R: Router> DispatchRunner<'a, R> {
    /// Create a runner.
    ///
    /// Validates the configuration and, when `config.num_threads` is set,
    /// builds a dedicated worker pool of that size; otherwise batches run on
    /// the global Rayon pool.
    pub fn new(
        graph:  &'a RoadGraph,
        router: R,
        depot:  NodeId,
        config: TourConfig,
    ) -> DispatchResult<Self> {
        config.validate()?;

        let pool = match config.num_threads {
            None => None,
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| DispatchError::ThreadPool(e.to_string()))?,
            ),
        };

        Ok(Self { graph, router, depot, config, pool })
    }

    /// Compute one outcome per request, concurrently.
    ///
    /// Returns the outcomes in request order, or `None` if `token` was
    /// cancelled — a cancelled batch's results are discarded when they
    /// complete rather than merged.
    ///
    /// Outcomes are always per-courier: an infeasible or failed tour never
    /// affects the other couriers in the batch.
    pub fn run<O: DispatchObserver>(
        &self,
        requests: &[TourRequest],
        token:    &CancelToken,
        observer: &mut O,
    ) -> Option<Vec<(CourierId, TourOutcome)>> {
        observer.on_batch_start(requests.len());

        let compute = || {
            requests
                .par_iter()
                .map(|request| {
                    if token.is_cancelled() {
                        return None; // superseded: skip the remaining work
                    }
                    Some((request.courier, self.compute_one(request)))
                })
                .collect::<Vec<_>>()
        };
        let outcomes = match &self.pool {
            Some(pool) => pool.install(compute),
            None       => compute(),
        };

        if token.is_cancelled() {
            return None;
        }
        // Not cancelled → every slot completed.
        let outcomes: Vec<(CourierId, TourOutcome)> =
            outcomes.into_iter().flatten().collect();

        let mut planned = 0;
        let mut infeasible = 0;
        let mut failed = 0;
        for (courier, outcome) in &outcomes {
            match outcome {
                TourOutcome::Planned(_) => planned += 1,
                TourOutcome::Infeasible => infeasible += 1,
                TourOutcome::Failed { .. } => failed += 1,
            }
            observer.on_tour_done(*courier, outcome);
        }
        observer.on_batch_end(planned, infeasible, failed);

        Some(outcomes)
    }

    /// Plan a single courier, converting every possible ending into an
    /// outcome.  A panic anywhere in the search is caught here, at the
    /// courier boundary, so it poisons only this courier's result.
    fn compute_one(&self, request: &TourRequest) -> TourOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            plan_tour(self.graph, &self.router, self.depot, request, &self.config)
        }));

        match result {
            Ok(Some(tour)) => TourOutcome::Planned(tour),
            Ok(None)       => TourOutcome::Infeasible,
            Err(payload)   => TourOutcome::Failed { message: panic_message(payload) },
        }
    }
}

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tour computation panicked".to_string()
    }
}

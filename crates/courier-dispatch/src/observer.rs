//! Batch observer trait for progress reporting.

use courier_core::CourierId;

use crate::TourOutcome;

/// Callbacks invoked by [`DispatchRunner::run`][crate::DispatchRunner::run]
/// at key points in a batch.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Outcome callbacks fire after the
/// parallel compute phase, in request order, and never for a cancelled
/// batch.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl DispatchObserver for ProgressPrinter {
///     fn on_tour_done(&mut self, courier: CourierId, outcome: &TourOutcome) {
///         println!("{courier}: {outcome}");
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called once when the batch starts, before any tour is computed.
    fn on_batch_start(&mut self, _couriers: usize) {}

    /// Called once per courier with their final outcome, in request order.
    fn on_tour_done(&mut self, _courier: CourierId, _outcome: &TourOutcome) {}

    /// Called once after all outcomes have been reported.
    fn on_batch_end(&mut self, _planned: usize, _infeasible: usize, _failed: usize) {}
}

/// A [`DispatchObserver`] that does nothing.  Use when you need to call
/// `run` but don't want progress callbacks.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

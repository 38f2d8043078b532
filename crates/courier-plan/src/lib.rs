//! `courier-plan` — the tour-computing engine.
//!
//! Given a road graph, a depot, and one courier's delivery requests, compute
//! the shortest feasible round trip that serves every delivery inside its
//! time window.
//!
//! # Pipeline
//!
//! ```text
//! TourRequest ─┐
//!              ├─► ShortestPathGraph ─► optimizer ─► assembler ─► ComputedTour
//! RoadGraph  ──┘      (index)            (order +      (full
//!                                         times)        route)
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`request`]   | `DeliveryRequest`, `TourRequest`                       |
//! | [`index`]     | `ShortestPathGraph` — pruned all-pairs path index      |
//! | [`clock`]     | feasibility replay (`simulate`, `TourSchedule`)        |
//! | [`optimizer`] | exact, parallel-exact, and greedy tour search          |
//! | [`assemble`]  | cycle → continuous node route                          |
//! | [`plan`]      | `plan_tour` pipeline, `ComputedTour`                   |
//!
//! "No feasible tour" is an expected outcome, not an error: every search
//! entry point returns `Option` and `None` means the windows cannot all be
//! met.  The engine is deterministic — identical inputs yield identical
//! tours, including tie-breaks.

pub mod assemble;
pub mod clock;
pub mod index;
pub mod optimizer;
pub mod plan;
pub mod request;

#[cfg(test)]
mod tests;

pub use clock::{simulate, TourSchedule};
pub use index::{PathEdge, ShortestPathGraph, Stop};
pub use plan::{plan_tour, ComputedTour, TimedDelivery};
pub use request::{DeliveryRequest, TourRequest};

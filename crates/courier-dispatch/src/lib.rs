//! `courier-dispatch` — batch orchestration for the tour planner.
//!
//! One planning batch takes a set of per-courier tour requests and produces
//! one independent [`TourOutcome`] per courier: a computed tour, an explicit
//! "no feasible tour", or a recovered computation failure.  Couriers never
//! affect each other — a panic or infeasibility in one tour leaves the rest
//! of the batch intact.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`runner`]   | `DispatchRunner`, `CancelToken`                       |
//! | [`outcome`]  | `TourOutcome`                                         |
//! | [`observer`] | `DispatchObserver`, `NoopObserver`                    |
//! | [`loader`]   | delivery-request CSV loading                          |
//! | [`error`]    | `DispatchError`, `DispatchResult<T>`                  |
//!
//! # Cancellation
//!
//! A [`CancelToken`] makes a batch abandonable: when the surrounding system
//! supersedes a batch (inputs changed mid-computation), in-flight work
//! finishes but its results are discarded rather than merged — the run
//! returns nothing instead of a stale answer.

pub mod error;
pub mod loader;
pub mod observer;
pub mod outcome;
pub mod runner;


pub use error::{DispatchError, DispatchResult};
pub use loader::{load_requests_csv, load_requests_reader};
pub use observer::{DispatchObserver, NoopObserver};
pub use outcome::TourOutcome;
pub use runner::{CancelToken, DispatchRunner};

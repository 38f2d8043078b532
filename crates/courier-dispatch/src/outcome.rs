//! Per-courier batch outcome.

use std::fmt;

use courier_plan::ComputedTour;

/// What one courier's planning produced.
///
/// The three cases the surrounding system must distinguish:
///
/// - [`Planned`](Self::Planned) — a complete feasible tour.
/// - [`Infeasible`](Self::Infeasible) — no ordering satisfies every window.
///   Expected and user-facing (over-constrained requests), not a fault.
/// - [`Failed`](Self::Failed) — the computation itself broke (recovered
///   worker panic); carries a diagnostic message.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TourOutcome {
    Planned(ComputedTour),
    Infeasible,
    Failed { message: String },
}

impl TourOutcome {
    pub fn is_planned(&self) -> bool {
        matches!(self, TourOutcome::Planned(_))
    }

    /// The computed tour, if planning succeeded.
    pub fn tour(&self) -> Option<&ComputedTour> {
        match self {
            TourOutcome::Planned(tour) => Some(tour),
            _ => None,
        }
    }
}

impl fmt::Display for TourOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourOutcome::Planned(tour) => write!(
                f,
                "planned: {} deliveries over {:.0} m",
                tour.deliveries.len(),
                tour.length_m(),
            ),
            TourOutcome::Infeasible => f.write_str("no feasible tour"),
            TourOutcome::Failed { message } => write!(f, "computation failed: {message}"),
        }
    }
}

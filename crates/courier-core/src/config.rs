//! Tour-planning configuration.
//!
//! Everything the feasibility arithmetic depends on — depot departure time,
//! window width, travel speed, per-stop service time — plus the
//! exact-vs-greedy switchover threshold and the worker count.  All of these
//! are plain configuration: the solver crates contain no literal constants
//! of their own.

use thiserror::Error;

use crate::TimeWindow;

/// Largest `exact_search_limit` the optimizer accepts.
///
/// The parallel exact search materializes all D! permutations before
/// chunking them across workers; 10! ≈ 3.6 M rows is the largest table
/// worth holding in memory — beyond that the search would not finish
/// anyway.
pub const MAX_EXACT_SEARCH_LIMIT: usize = 10;

// ── TourConfig ────────────────────────────────────────────────────────────────

/// Constants governing one planning run.
///
/// Typically loaded from a TOML/JSON file by the application crate (enable
/// the `serde` feature) and passed by reference into the planner; the
/// defaults reproduce the standard one-day scenario: depart 08:00, one-hour
/// windows, 15 km/h, 5 min per stop, exact search up to 8 deliveries.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourConfig {
    /// Depot departure time in minutes after midnight.  Default: 480 (08:00).
    pub depart_time_min: f64,

    /// Width of every delivery window in minutes.  Default: 60.
    pub window_size_min: f64,

    /// Average courier travel speed in km/h, used to convert edge lengths to
    /// travel minutes.  Default: 15.
    pub travel_speed_kmh: f64,

    /// Dwell time per delivery in minutes.  Default: 5.
    pub service_time_min: f64,

    /// Largest delivery count still solved by exact permutation search;
    /// above it the greedy heuristic takes over.  Trades optimality for
    /// tractability — raise with care (cost is factorial).  Default: 8.
    pub exact_search_limit: usize,

    /// Worker thread count for the planning pool.  `None` uses all logical
    /// cores.
    pub num_threads: Option<usize>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            depart_time_min:    8.0 * 60.0,
            window_size_min:    60.0,
            travel_speed_kmh:   15.0,
            service_time_min:   5.0,
            exact_search_limit: 8,
            num_threads:        None,
        }
    }
}

impl TourConfig {
    /// Check the configuration for values the solver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.travel_speed_kmh > 0.0) || !self.travel_speed_kmh.is_finite() {
            return Err(ConfigError::NonPositiveSpeed(self.travel_speed_kmh));
        }
        if !(self.window_size_min > 0.0) || !self.window_size_min.is_finite() {
            return Err(ConfigError::NonPositiveWindow(self.window_size_min));
        }
        if !(self.service_time_min >= 0.0) {
            return Err(ConfigError::NegativeService(self.service_time_min));
        }
        if !(self.depart_time_min >= 0.0) {
            return Err(ConfigError::NegativeDepart(self.depart_time_min));
        }
        if self.exact_search_limit > MAX_EXACT_SEARCH_LIMIT {
            return Err(ConfigError::ExactLimitTooLarge(self.exact_search_limit));
        }
        Ok(())
    }

    /// Travel time in minutes for a distance given in centimetres.
    ///
    /// minutes = metres / (km/h · 1000) · 60
    #[inline]
    pub fn travel_minutes(&self, length_cm: u64) -> f64 {
        let metres = length_cm as f64 / 100.0;
        metres / (self.travel_speed_kmh * 1000.0) * 60.0
    }

    /// The depot's pseudo time window: the hour the courier departs.
    ///
    /// The depot participates in the shortest-path index like any other stop
    /// and needs a window hour for the domination rule; its own visit is
    /// never window-checked.
    #[inline]
    pub fn depart_window(&self) -> TimeWindow {
        TimeWindow::new((self.depart_time_min / 60.0) as u32)
    }
}

// ── ConfigError ───────────────────────────────────────────────────────────────

/// Rejected [`TourConfig`] values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("travel speed must be positive and finite, got {0} km/h")]
    NonPositiveSpeed(f64),

    #[error("time window size must be positive and finite, got {0} min")]
    NonPositiveWindow(f64),

    #[error("service time must be non-negative, got {0} min")]
    NegativeService(f64),

    #[error("depot departure time must be non-negative, got {0} min")]
    NegativeDepart(f64),

    #[error("exact search limit {0} exceeds the supported maximum")]
    ExactLimitTooLarge(usize),
}

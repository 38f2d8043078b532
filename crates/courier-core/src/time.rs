//! Delivery time model.
//!
//! # Design
//!
//! The planning day is measured in **minutes after midnight** as `f64`
//! (travel times are fractional).  Two small types sit on top of that:
//!
//! - [`TimeWindow`] — the hour-granular delivery window promised to a
//!   customer.  `TimeWindow { hour: 8 }` means "between 08:00 and 09:00"
//!   (the width is a [`TourConfig`](crate::TourConfig) constant, not a
//!   property of the window itself).
//! - [`ClockTime`] — an `HH:MM` wall-clock rendering of a minute count,
//!   used when presenting computed visit times.

use std::fmt;

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// An hour-granular delivery window: the interval starting at `hour:00`.
///
/// Windows are compared by hour; a window "precedes" another when its hour is
/// smaller.  The interval width comes from configuration so that all windows
/// in one planning run share it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    /// Hour of the day the window opens (0–23 in practice).
    pub hour: u32,
}

impl TimeWindow {
    #[inline]
    pub fn new(hour: u32) -> Self {
        Self { hour }
    }

    /// Window opening time in minutes after midnight.
    #[inline]
    pub fn start_min(self) -> f64 {
        self.hour as f64 * 60.0
    }

    /// Window closing time in minutes after midnight, given the configured
    /// window width.
    #[inline]
    pub fn end_min(self, window_size_min: f64) -> f64 {
        self.start_min() + window_size_min
    }

    /// `true` if this window has fully elapsed once `other` is open —
    /// i.e. no courier serving `other` can still legally serve `self` after.
    #[inline]
    pub fn elapsed_before(self, other: TimeWindow) -> bool {
        self.hour + 1 <= other.hour
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00–{:02}:00", self.hour, self.hour + 1)
    }
}

// ── ClockTime ─────────────────────────────────────────────────────────────────

/// A wall-clock `HH:MM` time derived from a minutes-after-midnight count.
///
/// Seconds are truncated, matching how visit times are reported to
/// dispatchers (a courier is never promised sub-minute precision).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    pub hour:   u32,
    pub minute: u32,
}

impl ClockTime {
    /// Break a minutes-after-midnight count into hour and minute components.
    pub fn from_minutes(minutes: f64) -> Self {
        let total = minutes.max(0.0) as u32;
        Self {
            hour:   total / 60,
            minute: total % 60,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

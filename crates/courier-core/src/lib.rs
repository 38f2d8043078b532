//! `courier-core` — foundational types for the `rust_courier` tour planner.
//!
//! This crate is a dependency of every other `courier-*` crate.  It
//! intentionally has no `courier-*` dependencies and minimal external ones
//! (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `CourierId`                       |
//! | [`geo`]    | `GeoPoint`, haversine distance                        |
//! | [`time`]   | `TimeWindow`, `ClockTime`                             |
//! | [`config`] | `TourConfig`, `ConfigError`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.     |

pub mod config;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ConfigError, TourConfig};
pub use geo::GeoPoint;
pub use ids::{CourierId, EdgeId, NodeId};
pub use time::{ClockTime, TimeWindow};

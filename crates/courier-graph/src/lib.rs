//! `courier-graph` — road network, routing, and map loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`network`] | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`           |
//! | [`router`]  | `Router` trait, `ShortestPath`, `DijkstraRouter`         |
//! | [`loader`]  | `LoadedMap`, CSV road-map loading                        |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                           |
//!
//! The graph is built once per loaded map and is read-only afterwards
//! (`RoadGraph` owns only plain arrays and an R-tree, so it is `Send + Sync`
//! and can be shared by reference across planning workers).

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use loader::{load_map_csv, load_map_readers, LoadedMap};
pub use network::{RoadGraph, RoadGraphBuilder};
pub use router::{DijkstraRouter, Router, ShortestPath};

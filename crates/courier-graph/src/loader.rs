//! CSV road-map loader.
//!
//! # CSV format
//!
//! Two files describe a map: intersections and one-way segments.
//!
//! ```csv
//! id,latitude,longitude
//! 25175791,45.75406,4.857418
//! 2129259178,45.750404,4.8744674
//! ```
//!
//! ```csv
//! origin,destination,length_m
//! 25175791,2129259178,69.979805
//! 2129259178,25175791,
//! ```
//!
//! **`length_m`** may be left blank; the haversine distance between the
//! endpoint coordinates is used instead.  Two-way streets appear as two
//! rows, one per direction.
//!
//! Intersection IDs in the files are arbitrary `u64`s (map-supplier IDs);
//! the loader assigns dense [`NodeId`]s in row order and keeps the mapping
//! so delivery requests addressed by supplier ID can be resolved.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use courier_core::{GeoPoint, NodeId};

use crate::network::{RoadGraph, RoadGraphBuilder};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IntersectionRecord {
    id:        u64,
    latitude:  f32,
    longitude: f32,
}

#[derive(Deserialize)]
struct SegmentRecord {
    origin:      u64,
    destination: u64,
    length_m:    Option<f32>,
}

// ── LoadedMap ─────────────────────────────────────────────────────────────────

/// A road map ready for planning: the graph, the depot node, and the
/// external-ID index.
#[derive(Debug)]
pub struct LoadedMap {
    /// The immutable road graph.
    pub graph: RoadGraph,

    /// The warehouse node every tour starts and ends at.
    pub depot: NodeId,

    /// Map-supplier intersection ID → dense node index.
    index: FxHashMap<u64, NodeId>,
}

impl LoadedMap {
    /// Resolve a map-supplier intersection ID to its node, if present.
    pub fn resolve(&self, external_id: u64) -> Option<NodeId> {
        self.index.get(&external_id).copied()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road map from intersection and segment CSV files.
///
/// `warehouse` is the map-supplier ID of the depot intersection; loading
/// fails with [`GraphError::UnknownWarehouse`] if it does not appear in the
/// intersection file.
pub fn load_map_csv(
    intersections: &Path,
    segments:      &Path,
    warehouse:     u64,
) -> GraphResult<LoadedMap> {
    let nodes_file = std::fs::File::open(intersections).map_err(GraphError::Io)?;
    let segs_file  = std::fs::File::open(segments).map_err(GraphError::Io)?;
    load_map_readers(nodes_file, segs_file, warehouse)
}

/// Like [`load_map_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or loading from network
/// streams.
pub fn load_map_readers<N: Read, S: Read>(
    intersections: N,
    segments:      S,
    warehouse:     u64,
) -> GraphResult<LoadedMap> {
    let mut builder = RoadGraphBuilder::new();
    let mut index: FxHashMap<u64, NodeId> = FxHashMap::default();

    // ── Intersections ─────────────────────────────────────────────────────
    let mut nodes_reader = csv::Reader::from_reader(intersections);
    for result in nodes_reader.deserialize::<IntersectionRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;
        let node = builder.add_node(GeoPoint::new(row.latitude, row.longitude));
        if index.insert(row.id, node).is_some() {
            return Err(GraphError::Parse(format!(
                "duplicate intersection id {} in road map", row.id
            )));
        }
    }

    // ── Segments ──────────────────────────────────────────────────────────
    let mut segs_reader = csv::Reader::from_reader(segments);
    for result in segs_reader.deserialize::<SegmentRecord>() {
        let row = result.map_err(|e| GraphError::Parse(e.to_string()))?;

        let from = *index.get(&row.origin)
            .ok_or(GraphError::UnknownIntersection(row.origin))?;
        let to = *index.get(&row.destination)
            .ok_or(GraphError::UnknownIntersection(row.destination))?;

        let length_m = match row.length_m {
            Some(l) => l,
            None    => builder.node_pos(from).distance_m(builder.node_pos(to)),
        };
        builder.add_segment(from, to, length_m);
    }

    let depot = *index.get(&warehouse)
        .ok_or(GraphError::UnknownWarehouse(warehouse))?;

    Ok(LoadedMap { graph: builder.build()?, depot, index })
}

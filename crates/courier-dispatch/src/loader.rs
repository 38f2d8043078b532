//! Delivery-request CSV loader.
//!
//! # CSV format
//!
//! One row per requested delivery:
//!
//! ```csv
//! courier,intersection,latitude,longitude,window_hour
//! 0,25175791,,,8
//! 0,,45.75195,4.8752,9
//! 1,2129259178,,,8
//! ```
//!
//! Each row addresses its drop-off either by map-supplier **intersection**
//! ID or by a **latitude/longitude** pair, which is snapped to the nearest
//! road node (the way a dispatcher clicks a map position).  Exactly one of
//! the two forms must be present.
//!
//! Rows are grouped into one [`TourRequest`] per courier, in first-seen
//! courier order; duplicate deliveries at one node collapse per the usual
//! request semantics.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use courier_core::{CourierId, GeoPoint, NodeId};
use courier_graph::LoadedMap;
use courier_plan::{DeliveryRequest, TourRequest};

use crate::{DispatchError, DispatchResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RequestRecord {
    courier:      u32,
    intersection: Option<u64>,
    latitude:     Option<f32>,
    longitude:    Option<f32>,
    window_hour:  u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-courier tour requests from a CSV file.
pub fn load_requests_csv(path: &Path, map: &LoadedMap) -> DispatchResult<Vec<TourRequest>> {
    let file = std::fs::File::open(path).map_err(DispatchError::Io)?;
    load_requests_reader(file, map)
}

/// Like [`load_requests_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_requests_reader<R: Read>(
    reader: R,
    map:    &LoadedMap,
) -> DispatchResult<Vec<TourRequest>> {
    let mut requests: Vec<TourRequest> = Vec::new();
    let mut by_courier: FxHashMap<CourierId, usize> = FxHashMap::default();

    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize::<RequestRecord>() {
        let row = result.map_err(|e| DispatchError::Parse(e.to_string()))?;
        let node = resolve_location(&row, map)?;

        let courier = CourierId(row.courier);
        let slot = *by_courier.entry(courier).or_insert_with(|| {
            requests.push(TourRequest::new(courier));
            requests.len() - 1
        });
        requests[slot].add(DeliveryRequest::new(node, row.window_hour));
    }

    Ok(requests)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_location(row: &RequestRecord, map: &LoadedMap) -> DispatchResult<NodeId> {
    if let Some(external) = row.intersection {
        return map
            .resolve(external)
            .ok_or(DispatchError::UnknownIntersection(external));
    }

    match (row.latitude, row.longitude) {
        (Some(lat), Some(lon)) => map
            .graph
            .snap_to_node(GeoPoint::new(lat, lon))
            .ok_or(DispatchError::NoNearbyIntersection { lat, lon }),
        _ => Err(DispatchError::Parse(
            "request row must give an intersection id or a latitude/longitude pair".into(),
        )),
    }
}

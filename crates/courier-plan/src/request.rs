//! Delivery and tour request types.
//!
//! A delivery request is the unique-per-location demand signal: two requests
//! at the same node are the same request, so [`TourRequest`] keys its
//! deliveries by node and later additions replace earlier ones.  The map is
//! a `BTreeMap` so that snapshot iteration order — and therefore every
//! downstream tie-break — is deterministic.

use std::collections::BTreeMap;

use courier_core::{CourierId, NodeId, TimeWindow};

// ── DeliveryRequest ───────────────────────────────────────────────────────────

/// One requested delivery: a road-network node and the hour window the
/// customer was promised.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryRequest {
    pub node:   NodeId,
    pub window: TimeWindow,
}

impl DeliveryRequest {
    pub fn new(node: NodeId, window_hour: u32) -> Self {
        Self { node, window: TimeWindow::new(window_hour) }
    }
}

// ── TourRequest ───────────────────────────────────────────────────────────────

/// The deliveries assigned to one courier for the day.
///
/// Mutated by the surrounding dispatch service as deliveries are added,
/// removed, or reassigned; the planner only ever reads a snapshot.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourRequest {
    pub courier: CourierId,
    deliveries:  BTreeMap<NodeId, DeliveryRequest>,
}

impl TourRequest {
    pub fn new(courier: CourierId) -> Self {
        Self { courier, deliveries: BTreeMap::new() }
    }

    /// Add (or replace) the delivery at `request.node`.
    ///
    /// Returns the previous request at that node, if any.
    pub fn add(&mut self, request: DeliveryRequest) -> Option<DeliveryRequest> {
        self.deliveries.insert(request.node, request)
    }

    /// Remove the delivery at `node`, returning it if present.
    pub fn remove(&mut self, node: NodeId) -> Option<DeliveryRequest> {
        self.deliveries.remove(&node)
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Snapshot iteration in ascending node order.
    pub fn deliveries(&self) -> impl Iterator<Item = &DeliveryRequest> + '_ {
        self.deliveries.values()
    }
}

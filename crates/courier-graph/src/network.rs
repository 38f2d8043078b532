//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_cm`) are sorted by
//! origin node and indexed by `EdgeId`, so iterating a node's outgoing edges
//! is a contiguous memory scan — ideal for Dijkstra's inner loop.
//!
//! # Units
//!
//! Edge lengths are stored as integer **centimetres** (`u32` per edge,
//! `u64` for path totals).  Integer costs make every length comparison in
//! the planner exact and deterministic; `u32` centimetres cover segments up
//! to ~42,900 km, far beyond any city street.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to resolve coordinate-addressed delivery requests to road nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use courier_core::{EdgeId, GeoPoint, NodeId};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city (error < 0.1 % at ≤ 60° lat).
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Immutable directed road graph in CSR format plus a spatial index.
///
/// Built once per loaded map via [`RoadGraphBuilder`]; read-only afterwards,
/// so it can be shared by reference across concurrent planning workers
/// without synchronization.  CSR/edge fields are `pub` for direct indexed
/// access on hot paths.
#[derive(Debug)]
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each intersection.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Origin node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in centimetres.  The Dijkstra edge cost.
    pub edge_length_cm: Vec<u32>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Edge length in metres (presentation; the planner works in cm).
    #[inline]
    pub fn edge_length_m(&self, edge: EdgeId) -> f32 {
        self.edge_length_cm[edge.index()] as f32 / 100.0
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest intersection to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed segments in any order.  `build()`
/// validates every segment endpoint, sorts edges by origin node, constructs
/// the CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use courier_core::GeoPoint;
/// use courier_graph::RoadGraphBuilder;
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(GeoPoint::new(45.75, 4.85));
/// let c = b.add_node(GeoPoint::new(45.76, 4.86));
/// b.add_segment(a, c, 1_200.0); // one-way, 1.2 km
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct RoadGraphBuilder {
    nodes:    Vec<GeoPoint>,
    segments: Vec<RawSegment>,
}

struct RawSegment {
    from:      NodeId,
    to:        NodeId,
    length_cm: u32,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), segments: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and segments to reduce
    /// reallocations when bulk-loading a map file.
    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        Self {
            nodes:    Vec::with_capacity(nodes),
            segments: Vec::with_capacity(segments),
        }
    }

    /// Add an intersection and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **one-way** street segment from `from` to `to`.
    ///
    /// `length_m` is the physical length in metres; it is rounded to whole
    /// centimetres for storage.  Two-way streets appear as two segments, one
    /// per direction (they are distinct edges and may differ in length).
    pub fn add_segment(&mut self, from: NodeId, to: NodeId, length_m: f32) {
        let length_cm = (length_m as f64 * 100.0).round() as u32;
        self.segments.push(RawSegment { from, to, length_cm });
    }

    /// Position of a node added earlier (used by the map loader to derive a
    /// missing segment length from its endpoint coordinates).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Fails with [`GraphError::UnknownNode`] if a segment references a node
    /// that was never added, and with [`GraphError::ZeroLengthEdge`] if a
    /// segment's length rounds to zero centimetres (the routing invariant
    /// requires strictly positive edge costs).
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> GraphResult<RoadGraph> {
        let node_count = self.nodes.len();
        let edge_count = self.segments.len();

        for seg in &self.segments {
            if seg.from.index() >= node_count {
                return Err(GraphError::UnknownNode(seg.from));
            }
            if seg.to.index() >= node_count {
                return Err(GraphError::UnknownNode(seg.to));
            }
            if seg.length_cm == 0 {
                return Err(GraphError::ZeroLengthEdge { from: seg.from, to: seg.to });
            }
        }

        // Sort edges by origin node for CSR construction.  The stable sort
        // preserves insertion order within a node, keeping neighbor iteration
        // order — and therefore routing tie-breaks — reproducible for
        // identical input.
        let mut raw = self.segments;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:      Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:        Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_cm: Vec<u32>    = raw.iter().map(|e| e.length_cm).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_cm,
            spatial_idx,
        })
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

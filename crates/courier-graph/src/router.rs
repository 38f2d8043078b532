//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The shortest-path index calls routing via the [`Router`] trait, so
//! applications can swap in custom implementations (A*, contraction
//! hierarchies) without touching the planner.  The default
//! [`DijkstraRouter`] is sufficient for city-scale maps.
//!
//! # Output
//!
//! A query returns the total length **and the concrete node path**: the
//! planner stores the path on every inter-delivery edge so the final tour
//! route can be stitched together without re-running any search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use courier_core::NodeId;

use crate::network::RoadGraph;
use crate::{GraphError, GraphResult};

// ── ShortestPath ──────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone)]
pub struct ShortestPath {
    /// Total length in centimetres.
    pub length_cm: u64,
    /// Every node visited, in order, including both endpoints.
    /// A query with `from == to` yields the single-node path.
    pub nodes: Vec<NodeId>,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so they can be shared across Rayon
/// workers during parallel shortest-path index construction.
pub trait Router: Send + Sync {
    /// Compute a shortest path from `from` to `to`.
    ///
    /// Returns [`GraphError::NoRoute`] if `to` is unreachable.
    ///
    /// # Panics
    ///
    /// May panic if `from` or `to` are not nodes of `graph`; valid node IDs
    /// are the caller's responsibility.
    fn shortest_path(&self, graph: &RoadGraph, from: NodeId, to: NodeId)
        -> GraphResult<ShortestPath>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph.
///
/// Edge lengths are non-negative by construction, so no re-expansion is
/// needed; ties on the priority queue are broken by node index, making the
/// returned path deterministic for identical input.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(&self, graph: &RoadGraph, from: NodeId, to: NodeId)
        -> GraphResult<ShortestPath>
    {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId) -> GraphResult<ShortestPath> {
    if from == to {
        return Ok(ShortestPath { length_cm: 0, nodes: vec![from] });
    }

    let n = graph.node_count();
    // dist[v] = best known cost (cm) to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev[v] = predecessor of v on the best path; INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_length_cm[edge.index()] as u64;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(prev: Vec<NodeId>, from: NodeId, to: NodeId, total_cm: u64) -> ShortestPath {
    let mut nodes = Vec::new();
    let mut cur = to;
    while cur != NodeId::INVALID {
        nodes.push(cur);
        if cur == from {
            break;
        }
        cur = prev[cur.index()];
    }
    nodes.reverse();
    ShortestPath { length_cm: total_cm, nodes }
}

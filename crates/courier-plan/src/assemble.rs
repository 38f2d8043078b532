//! Route assembly — expand a solved delivery cycle into the continuous
//! road-node walk a courier actually drives.
//!
//! Every index edge already carries its concrete node path, so assembly is
//! pure concatenation: each segment's path is appended minus its final
//! node (the junction the next segment starts from), and the closing
//! segment back to the depot is appended whole, restoring the dropped
//! junction and ending the walk where it began.

use courier_core::NodeId;

use crate::index::ShortestPathGraph;

/// Stitch the full route for `order` (stop indices, depot first).
///
/// Returns `None` if an edge of the cycle is missing from the index; the
/// optimizer only emits orders it has already simulated, so that can only
/// happen for orders a caller constructed by hand.
pub fn assemble_route(order: &[usize], sp: &ShortestPathGraph) -> Option<Vec<NodeId>> {
    let stops = sp.stops();
    let mut route: Vec<NodeId> = Vec::new();

    for pair in order.windows(2) {
        let edge = sp.edge(stops[pair[0]].node, stops[pair[1]].node)?;
        route.extend_from_slice(&edge.path);
        route.pop(); // duplicated junction; the next segment re-adds it
    }

    let closing = sp.edge(stops[*order.last()?].node, stops[order[0]].node)?;
    route.extend_from_slice(&closing.path);

    Some(route)
}

//! Graph-subsystem error type.

use thiserror::Error;

use courier_core::NodeId;

/// Errors produced by `courier-graph`.
///
/// Build and load failures are fatal to map loading and are not retried;
/// [`GraphError::NoRoute`] is the one variant routinely handled by callers
/// (the shortest-path index omits the corresponding edge).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge references unknown node {0}")]
    UnknownNode(NodeId),

    #[error("edge {from} → {to} has zero length")]
    ZeroLengthEdge { from: NodeId, to: NodeId },

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("unknown intersection id {0} in road map")]
    UnknownIntersection(u64),

    #[error("warehouse intersection {0} not present in road map")]
    UnknownWarehouse(u64),

    #[error("road map parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

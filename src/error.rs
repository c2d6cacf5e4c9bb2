//! Crate-wide error taxonomy.

use crate::graph::types::{EdgeId, ElementKind, NodeId};
use thiserror::Error;

/// Errors that can occur during graph and view operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node \"{0}\" not found")]
    NodeNotFound(NodeId),

    #[error("edge \"{0}\" not found")]
    EdgeNotFound(EdgeId),

    #[error("node \"{0}\" already exists")]
    NodeAlreadyExists(NodeId),

    #[error("edge \"{0}\" already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("invalid edge \"{edge}\": source node \"{node}\" does not exist")]
    InvalidEdgeSource { edge: EdgeId, node: NodeId },

    #[error("invalid edge \"{edge}\": target node \"{node}\" does not exist")]
    InvalidEdgeTarget { edge: EdgeId, node: NodeId },

    #[error("{kind} index {index} out of range (length {len})")]
    IndexOutOfRange {
        kind: ElementKind,
        index: usize,
        len: usize,
    },

    /// An edge is selected for inclusion but one of its endpoints cannot be
    /// resolved in the view. The base graph must emit node events before the
    /// events of their edges; this error means that ordering was violated.
    #[error("edge \"{edge}\" is included but endpoint \"{node}\" cannot be resolved in the view")]
    UnresolvedEndpoint { edge: EdgeId, node: NodeId },

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

pub type GraphResult<T> = Result<T, GraphError>;

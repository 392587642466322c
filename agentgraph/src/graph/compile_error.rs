//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the node/edge table is structurally invalid.
//! Every variant is detected at build time, before any run starts.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// `START` or `END` was used as a node id.
    #[error("'{0}' is reserved and cannot be used as a node id")]
    ReservedName(String),

    /// No edge leaves START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// More than one edge leaves START.
    #[error("graph has more than one edge from START")]
    MultipleStart,

    /// Edge that can never be valid (END as source, START as target, conditional entry).
    #[error("invalid edge: {0}")]
    InvalidEdge(String),

    /// Two direct edges share the same source.
    #[error("node '{0}' has more than one direct outgoing edge")]
    DuplicateEdge(String),

    /// A source has both a direct edge and a conditional group, or two conditional groups.
    #[error("node '{0}' mixes outgoing edge kinds; use one direct edge or one conditional group")]
    ConflictingEdges(String),

    /// A node reachable from START has no outgoing edge.
    #[error("node '{0}' is reachable but has no outgoing edge (add an edge to END)")]
    DeadEnd(String),
}

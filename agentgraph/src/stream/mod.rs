//! Streaming types for graph runs.
//!
//! Defines stream modes and events. Used by `CompiledStateGraph::stream` /
//! `stream_resume`, which emit one event per completed superstep (per selected mode) and a
//! final `Interrupt` event when the run suspends.

use crate::graph::Interrupt;
use crate::state::{State, StateUpdate};

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node completes.
    Values,
    /// Emit the node id and the partial update it returned.
    Updates,
}

/// Streamed event emitted while running a graph.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamEvent {
    /// Full state snapshot after a node finishes.
    Values(State),
    /// Update returned by one node, before merging.
    Updates { node_id: String, update: StateUpdate },
    /// The run suspended at `node_id`; always emitted regardless of modes.
    Interrupt { node_id: String, interrupt: Interrupt },
}

//! Logging helpers for graph execution.
//!
//! Structured `tracing` events for run start/finish, node execution, interrupts and
//! checkpoint writes. The engine calls these; nodes log through `tracing` directly.

use crate::graph::Interrupt;

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: u64) {
    tracing::debug!(node_id = node_id, step, "Starting node execution");
}

/// Log node execution completion and the routing decision.
pub fn log_node_complete(node_id: &str, next: &str) {
    tracing::debug!(node_id = node_id, next = next, "Node execution complete");
}

/// Log a node suspending the run.
pub fn log_interrupt(node_id: &str, interrupt: &Interrupt) {
    tracing::info!(
        node_id = node_id,
        index = interrupt.index,
        payload = %interrupt.value,
        "Node interrupted; run suspended"
    );
}

/// Log a checkpoint write.
pub fn log_checkpoint_saved(thread_id: &str, step: u64, pending_node: &str) {
    tracing::trace!(thread_id = thread_id, step, pending_node = pending_node, "Checkpoint saved");
}

/// Log graph execution start.
pub fn log_graph_start(thread_id: Option<&str>, resuming: bool) {
    tracing::info!(thread_id = ?thread_id, resuming, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(thread_id: Option<&str>, steps: usize) {
    tracing::info!(thread_id = ?thread_id, steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &crate::error::GraphError) {
    tracing::error!(%error, "Graph execution error");
}

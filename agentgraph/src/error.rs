//! Error types for node execution and graph runs.
//!
//! [`AgentError`] is what a node returns; [`GraphError`] is what the engine returns
//! to the caller of `invoke` / `resume`. Compile-time defects use
//! [`CompilationError`](crate::graph::CompilationError) instead.

use thiserror::Error;

use crate::graph::Interrupt;
use crate::memory::CheckpointError;
use crate::state::StateError;

/// Node execution error.
///
/// Returned by `Node::run`. `Interrupted` is not a failure: it is the signal produced by
/// [`RunContext::interrupt`](crate::graph::RunContext::interrupt) and propagated with `?`
/// so the node stops before any of its update is merged.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A channel could not be read or written in the expected shape.
    #[error(transparent)]
    State(#[from] StateError),

    /// The node asked for external input; the run suspends at this node.
    #[error("interrupted: {}", .0.value)]
    Interrupted(Interrupt),
}

/// Engine-level error returned by `CompiledStateGraph::invoke`, `resume` and `stream`.
///
/// A fatal error ends the run; the last checkpoint written before the failing superstep
/// stays in place so `CompiledStateGraph::continue_run` can retry from it.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A conditional selector returned a label with no mapped target.
    #[error("no route from node '{node}' for label '{label}'")]
    Routing { node: String, label: String },

    /// `resume` was called for a thread that has no pending interrupt.
    #[error("thread '{0}' is not suspended")]
    NotSuspended(String),

    /// `continue_run` was called for a thread whose latest checkpoint is not mid-run.
    #[error("thread '{0}' has no unfinished run to continue")]
    NotRunning(String),

    /// The checkpointer failed; the engine does not continue with unsaved state.
    #[error("checkpoint persistence failed: {0}")]
    Persistence(#[from] CheckpointError),

    /// A node returned an error other than an interrupt.
    #[error("node '{node}' failed: {source}")]
    Node {
        node: String,
        #[source]
        source: AgentError,
    },

    /// The operation needs a checkpointer but the graph was compiled without one.
    #[error("graph was compiled without a checkpointer")]
    NoCheckpointer,

    /// A checkpointer is configured but the config carries no thread id.
    #[error("config.thread_id is required when a checkpointer is set")]
    MissingThreadId,

    /// More supersteps than `RunnableConfig::recursion_limit` in one call.
    #[error("recursion limit of {0} supersteps reached without hitting END")]
    RecursionLimit(usize),

    /// A checkpoint points at a node this graph does not have.
    #[error("checkpoint refers to unknown node '{0}'")]
    UnknownNode(String),
}

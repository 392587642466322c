//! State graph: nodes, channels and edges; compile, invoke, resume and stream.
//!
//! Aligns with LangGraph `StateGraph`: add nodes and edges (direct or conditional), compile,
//! then invoke with an input update. Nodes may suspend the run with
//! [`RunContext::interrupt`]; a checkpointer makes the suspension resumable.

mod compile_error;
mod compiled;
mod edge;
mod interrupt;
mod logging;
mod node;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use edge::{Edge, Selector};
pub use interrupt::{Command, Interrupt, RunResult, RunStatus, ThreadStatus};
pub use node::{FnNode, Node};
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};

//! # agentgraph
//!
//! A LangGraph-style agent execution engine in Rust. A [`State`] of named channels flows
//! through nodes; each node returns a partial [`StateUpdate`] that is merged by the channel's
//! policy (overwrite or append). Direct and conditional edges pick the next node, one node per
//! superstep, until `END`.
//!
//! ## Design Principles
//!
//! - **Channels, not structs**: state is a map of JSON channels with declared merge policies,
//!   so tool results and chat turns accumulate without nodes rewriting the whole history.
//! - **Compile once, run many**: [`StateGraph::compile`] validates the graph up front;
//!   the [`CompiledStateGraph`] is immutable and shared across concurrent threads.
//! - **In-band interrupts**: a node calls [`RunContext::interrupt`]; the run suspends, a
//!   checkpoint records where, and [`CompiledStateGraph::resume`] continues later (even in a
//!   new process with [`SqliteSaver`]).
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `RunContext`, `Command`.
//! - [`state`]: `State`, `StateUpdate`, `ChannelPolicy`, `StateSchema`.
//! - [`react`]: `ChatNode`, `ToolNode`, `tools_condition`, `ToolAgentConfig` for the tool loop.
//! - [`llm`]: `LlmClient` trait and a scripted `MockLlm`.
//! - [`memory`]: Checkpointing: `MemorySaver` and optional SQLite persistence.
//! - [`tool_source`]: `Tool`, `ToolRegistry`, `FnTool`.
//! - [`stream`]: `StreamMode` / `StreamEvent` for `CompiledStateGraph::stream`.
//!
//! ## Features
//!
//! - `sqlite` (default): Persistent checkpointer (`SqliteSaver`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agentgraph::{RunnableConfig, State, StateGraph, StateUpdate, END, START};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = StateGraph::new();
//! graph.add_fn_node("greet", |state: &State, _ctx: &agentgraph::RunContext| {
//!     let name = state.get_str("name").unwrap_or("world");
//!     Ok(StateUpdate::new().set("greeting", format!("hello, {}", name)))
//! });
//! graph.add_edge(START, "greet").add_edge("greet", END);
//!
//! let compiled = graph.compile()?;
//! let out = compiled
//!     .invoke(StateUpdate::new().set("name", "ada"), Some(RunnableConfig::default()))
//!     .await?;
//! assert_eq!(out.state.get_str("greeting"), Some("hello, ada"));
//! # Ok(())
//! # }
//! ```
//!
//! Runnable demos live in `agentgraph-examples`, e.g.
//! `cargo run -p agentgraph-examples --example tool_loop`.

pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod react;
pub mod state;
pub mod stream;
pub mod tool_source;

pub use error::{AgentError, GraphError};
pub use graph::{
    Command, CompilationError, CompiledStateGraph, FnNode, Interrupt, Node, RunContext,
    RunResult, RunStatus, StateGraph, ThreadStatus, END, START,
};
pub use llm::{LlmClient, LlmResponse, MockLlm};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointSource, Checkpointer, JsonSerializer, MemorySaver,
    RunnableConfig,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use message::{Message, ToolCall};
pub use react::{
    tools_condition, user_input, ChatNode, HandleToolErrors, ToolAgentConfig, ToolNode,
};
pub use state::{ChannelPolicy, State, StateSchema, StateUpdate};
pub use stream::{StreamEvent, StreamMode};
pub use tool_source::{FnTool, Tool, ToolCallContext, ToolError, ToolRegistry, ToolSpec};

//! # Memory: checkpointing
//!
//! Per-thread persistence of graph runs. After every superstep and whenever a node
//! interrupts, the engine writes the thread's latest [`Checkpoint`] (merged state, next node,
//! pending interrupt). `resume` and follow-up `invoke` calls load it by `thread_id`.
//!
//! ## Config
//!
//! [`RunnableConfig`] is passed to `CompiledStateGraph::invoke`. When using a checkpointer:
//! - `thread_id`: Required. Identifies the conversation/thread.
//! - `recursion_limit`: Optional. Max supersteps per call (default 25).
//!
//! ## Checkpointer Implementations
//!
//! | Type             | Persistence | Use case                    | Feature  |
//! |------------------|-------------|-----------------------------|----------|
//! | [`MemorySaver`]  | In-memory   | Dev, tests                  | —        |
//! | `SqliteSaver`    | SQLite file | Single-node, restarts       | `sqlite` |
//!
//! Use with [`StateGraph::compile_with_checkpointer`](crate::graph::StateGraph::compile_with_checkpointer).

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::{RunnableConfig, DEFAULT_RECURSION_LIMIT};
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;

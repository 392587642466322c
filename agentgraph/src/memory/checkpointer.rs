//! Checkpointer trait and error.
//!
//! One latest checkpoint per thread. The engine calls `put` after every superstep and on
//! suspension, and `get` at the start of `invoke` / `resume`.

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Checkpoint;

/// Error from checkpoint storage or (de)serialization.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Saves and loads the latest checkpoint of each thread.
///
/// Implementations must be safe to share across concurrent runs of different threads; the
/// engine never runs the same thread concurrently on purpose, but puts for different threads
/// may interleave.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Stores `checkpoint` as the thread's latest, replacing the previous one.
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Latest checkpoint of the thread, or `None` for an unknown thread.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// Removes the thread; returns whether it existed.
    async fn delete(&self, thread_id: &str) -> Result<bool, CheckpointError>;

    /// Ids of all stored threads, sorted.
    async fn list_threads(&self) -> Result<Vec<String>, CheckpointError>;
}

//! Checkpoint and metadata types.
//!
//! A checkpoint is the latest durable record of a thread: merged state, the next node to
//! run, and the pending interrupt with the resume values already supplied to it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{Interrupt, ThreadStatus, END};
use crate::state::State;

/// Per-process sequence appended to checkpoint ids; several checkpoints can share a
/// millisecond and a step (loop then exit, loop then interrupt).
static CHECKPOINT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Metadata for a single checkpoint (source, step, created_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Supersteps completed on this thread, across all calls.
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// Why the checkpoint was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointSource {
    /// After a completed superstep.
    Loop,
    /// A node suspended the run.
    Interrupt,
    /// The run reached END.
    Exit,
}

/// One checkpoint: state snapshot + pending position + id/ts.
///
/// Stored by a Checkpointer under its thread id; each put replaces the previous one.
///
/// **Interaction**: Produced by `CompiledStateGraph` after every superstep and on
/// suspension; consumed by `resume` and returned by `get_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub ts: String,
    pub state: State,
    /// Next node to run; `END` once the thread terminated.
    pub pending_node: String,
    /// Set while the thread is suspended.
    #[serde(default)]
    pub pending_interrupt: Option<Interrupt>,
    /// Resume values already consumed by `pending_node`, replayed in order on re-execution.
    #[serde(default)]
    pub resume_values: Vec<Value>,
    pub metadata: CheckpointMetadata,
}

impl Checkpoint {
    /// Creates a checkpoint from current state. Id is `{millis}-{step}-{seq}`.
    pub fn from_state(
        state: State,
        pending_node: impl Into<String>,
        source: CheckpointSource,
        step: u64,
    ) -> Self {
        let now = SystemTime::now();
        let ts = format!(
            "{}",
            now.duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        );
        let seq = CHECKPOINT_SEQ.fetch_add(1, Ordering::Relaxed);
        let id = format!("{}-{}-{}", ts, step, seq);
        Self {
            id,
            ts,
            state,
            pending_node: pending_node.into(),
            pending_interrupt: None,
            resume_values: Vec::new(),
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }

    /// Marks the checkpoint as suspended on `interrupt`.
    pub fn with_interrupt(mut self, interrupt: Interrupt, resume_values: Vec<Value>) -> Self {
        self.pending_interrupt = Some(interrupt);
        self.resume_values = resume_values;
        self
    }

    pub fn step(&self) -> u64 {
        self.metadata.step
    }

    /// Thread lifecycle implied by this checkpoint.
    pub fn status(&self) -> ThreadStatus {
        if self.pending_interrupt.is_some() {
            ThreadStatus::Suspended
        } else if self.pending_node == END {
            ThreadStatus::Terminated
        } else {
            ThreadStatus::Running
        }
    }
}

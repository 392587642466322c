//! Suspend/resume value types: what a node raises, what the caller sends back, and what a
//! run reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::State;

/// Request for external input raised from inside a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    /// Opaque payload describing what input is needed.
    pub value: Value,
    /// Position of the interrupt call within the node's execution (0 for the first call).
    pub index: usize,
}

impl Interrupt {
    pub fn new(value: Value, index: usize) -> Self {
        Self { value, index }
    }
}

/// External input that resumes a suspended thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Returned by the pending interrupt call when the node re-executes.
    pub resume: Value,
}

impl Command {
    pub fn resume(value: impl Into<Value>) -> Self {
        Self {
            resume: value.into(),
        }
    }
}

/// How a call to `invoke` / `resume` ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// The run reached END.
    Done,
    /// The run is suspended at `node` until resumed.
    Interrupted { node: String, interrupt: Interrupt },
}

/// Outcome of one `invoke` or `resume` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// State after the last completed superstep.
    pub state: State,
    pub status: RunStatus,
    /// Supersteps completed by this call (an interrupted attempt is not counted).
    pub steps: usize,
}

impl RunResult {
    pub fn is_done(&self) -> bool {
        matches!(self.status, RunStatus::Done)
    }

    /// Payload of the pending interrupt, if the run suspended.
    pub fn interrupt(&self) -> Option<&Value> {
        match &self.status {
            RunStatus::Interrupted { interrupt, .. } => Some(&interrupt.value),
            RunStatus::Done => None,
        }
    }

    /// Node the run is suspended at, if any.
    pub fn pending_node(&self) -> Option<&str> {
        match &self.status {
            RunStatus::Interrupted { node, .. } => Some(node),
            RunStatus::Done => None,
        }
    }
}

/// Lifecycle of a thread as recorded by its latest checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    /// Has a next node to run and no pending interrupt (e.g. a run stopped by an error).
    Running,
    /// Waiting for a resume command.
    Suspended,
    /// Reached END.
    Terminated,
}

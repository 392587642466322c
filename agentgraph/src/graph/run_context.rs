//! Per-invocation context handed to a node alongside the state.
//!
//! Carries the run config and the resume values for this node, and implements the
//! in-band interrupt call.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::error::AgentError;
use crate::graph::Interrupt;
use crate::memory::RunnableConfig;

/// Context for one node execution.
///
/// Created fresh by the engine for every superstep, so the interrupt counter always starts
/// at zero when a node (re-)executes.
#[derive(Debug)]
pub struct RunContext {
    /// Config for the current run (thread_id, recursion_limit).
    pub config: RunnableConfig,
    node_id: String,
    resume: Vec<Value>,
    next_interrupt: AtomicUsize,
}

impl RunContext {
    pub fn new(node_id: impl Into<String>, config: RunnableConfig, resume: Vec<Value>) -> Self {
        Self {
            config,
            node_id: node_id.into(),
            resume,
            next_interrupt: AtomicUsize::new(0),
        }
    }

    /// Id of the node being executed.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Asks for external input.
    ///
    /// The n-th call within one execution returns the n-th resume value when the run was
    /// resumed with one. Otherwise it returns `Err(AgentError::Interrupted)` carrying `value`;
    /// propagate it with `?` so the node stops and the run suspends here. On resume the node
    /// starts over from the beginning, so work before this call must be safe to repeat.
    pub fn interrupt(&self, value: Value) -> Result<Value, AgentError> {
        let index = self.next_interrupt.fetch_add(1, Ordering::SeqCst);
        match self.resume.get(index) {
            Some(answer) => Ok(answer.clone()),
            None => Err(AgentError::Interrupted(Interrupt::new(value, index))),
        }
    }

    /// True when this execution was started by `resume`.
    pub fn is_resuming(&self) -> bool {
        !self.resume.is_empty()
    }

    /// Resume values supplied so far, oldest first.
    pub fn resume_values(&self) -> &[Value] {
        &self.resume
    }

    pub(crate) fn into_resume_values(self) -> Vec<Value> {
        self.resume
    }
}

//! Context passed into tool calls for the current step.
//!
//! Gives tools the current conversation and the node's run context, so a tool can ask a
//! human through [`ToolCallContext::interrupt`].

use serde_json::Value;

use crate::error::AgentError;
use crate::graph::RunContext;
use crate::memory::RunnableConfig;
use crate::message::Message;

use super::ToolError;

/// Per-step context available to tools during execution.
///
/// **Interaction**: Built by `ToolNode` for each superstep; passed to `ToolRegistry::call`.
#[derive(Debug, Clone, Copy)]
pub struct ToolCallContext<'a> {
    /// Messages in the current state (before this step's tool results).
    pub recent_messages: &'a [Message],
    run: &'a RunContext,
}

impl<'a> ToolCallContext<'a> {
    pub fn new(recent_messages: &'a [Message], run: &'a RunContext) -> Self {
        Self {
            recent_messages,
            run,
        }
    }

    /// Config of the current run.
    pub fn config(&self) -> &RunnableConfig {
        &self.run.config
    }

    /// Asks for external input; see [`RunContext::interrupt`]. Propagate the error with `?`
    /// so the tool node suspends.
    pub fn interrupt(&self, value: Value) -> Result<Value, ToolError> {
        self.run.interrupt(value).map_err(|e| match e {
            AgentError::Interrupted(interrupt) => ToolError::Interrupted(interrupt),
            other => ToolError::Execution(other.to_string()),
        })
    }
}

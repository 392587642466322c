//! LLM client abstraction for the chat node.
//!
//! `ChatNode` depends on a callable that returns assistant text and optional tool_calls; this
//! module defines the trait and a scripted mock. Real model clients live outside the crate
//! and implement [`LlmClient`].

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};

/// Response from an LLM completion: assistant message text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; ChatNode writes `content` into a new
/// assistant message and `tool_calls` into the `tool_calls` channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means the loop ends after this turn.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    /// Final answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Turn that only requests tools.
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }
}

/// LLM client: given messages, returns assistant text and optional tool_calls.
///
/// ChatNode calls this once per superstep. Implementations bind their own tool list and model
/// settings at construction.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content and optional tool_calls.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}

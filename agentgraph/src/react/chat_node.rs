//! Chat node: read messages, call LLM, write assistant message and tool_calls.
//!
//! ChatNode holds an LLM client (e.g. MockLlm or any `LlmClient`), implements `Node`; run
//! reads the `messages` channel, calls the LLM once, appends the assistant message and sets
//! the `tool_calls` channel from the response (empty when the model is done).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{State, StateUpdate};

use super::{CHAT_NODE, MESSAGES, TOOL_CALLS};

/// Chat node: one turn that produces an assistant message and optional tool_calls.
///
/// An assistant message is appended when it has text or requests no tools; a bare tool
/// request only sets `tool_calls`.
///
/// **Interaction**: Implements `Node`; used by `ToolAgentConfig::build`. Consumes
/// `LlmClient`; writes the `messages` and `tool_calls` channels.
pub struct ChatNode {
    /// LLM client used to produce assistant message and optional tool_calls.
    llm: Arc<dyn LlmClient>,
}

impl ChatNode {
    /// Creates a chat node with the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node for ChatNode {
    fn id(&self) -> &str {
        CHAT_NODE
    }

    async fn run(&self, state: &State, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let messages: Vec<Message> = state.decode_or_default(MESSAGES)?;
        let response = self.llm.invoke(&messages).await?;
        debug!(
            tool_calls = response.tool_calls.len(),
            content_len = response.content.len(),
            "LLM turn complete"
        );

        let mut update = StateUpdate::new().set_serialized(TOOL_CALLS, &response.tool_calls)?;
        if !response.content.is_empty() || response.tool_calls.is_empty() {
            update = update.set_serialized(MESSAGES, &[Message::assistant(response.content)])?;
        }
        Ok(update)
    }
}

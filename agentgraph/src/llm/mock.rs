//! Mock LLM for tests and demos: replays scripted responses in order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{LlmClient, LlmResponse};
use crate::error::AgentError;
use crate::message::{Message, ToolCall};

/// Scripted LLM: each `invoke` pops the next response. When the script is exhausted it
/// returns the fallback response if one was set, otherwise an error.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    fallback: Option<LlmResponse>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Mock that replays `responses` in order.
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that always answers `content` without tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(Vec::new()).with_fallback(LlmResponse::text(content))
    }

    /// Mock that first requests `add_two_numbers(2, 3)` and then answers with the sum.
    pub fn add_two_numbers_example() -> Self {
        Self::new(vec![
            LlmResponse::tool_calls(vec![ToolCall::new(
                "call-1",
                "add_two_numbers",
                json!({"a": 2, "b": 3}),
            )]),
            LlmResponse::text("2 + 3 = 5"),
        ])
    }

    /// Response returned once the script is exhausted (builder style).
    pub fn with_fallback(mut self, response: LlmResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .map_err(|e| AgentError::ExecutionFailed(format!("mock llm lock poisoned: {}", e)))?
            .pop_front();
        next.or_else(|| self.fallback.clone()).ok_or_else(|| {
            AgentError::ExecutionFailed("mock llm has no scripted response left".into())
        })
    }
}

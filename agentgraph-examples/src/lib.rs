//! Shared setup for the agentgraph demos: environment config, logging and a rule-based
//! model that needs no network access.

use std::path::PathBuf;
use std::sync::Arc;

use agentgraph::{
    AgentError, FnTool, LlmClient, LlmResponse, Message, Tool, ToolCall, ToolError, ToolSpec,
};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Demo settings read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// SQLite file for persistent demos.
    pub db_path: PathBuf,
    /// Conversation thread to run on.
    pub thread_id: String,
}

impl DemoConfig {
    /// Fill config from env vars after loading `.env`.
    ///
    /// `AGENTGRAPH_DB_PATH` (default `agentgraph.db`), `AGENTGRAPH_THREAD_ID` (default `1`).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let db_path = std::env::var("AGENTGRAPH_DB_PATH")
            .unwrap_or_else(|_| "agentgraph.db".to_string())
            .into();
        let thread_id = std::env::var("AGENTGRAPH_THREAD_ID").unwrap_or_else(|_| "1".to_string());
        Self { db_path, thread_id }
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(rust_log))
        .try_init();
}

/// Prints a conversation one message per line.
pub fn print_messages(messages: &[Message]) {
    for m in messages {
        match m {
            Message::Tool { name, content, .. } => println!("[Tool:{}] {}", name, content),
            other => println!("[{}] {}", other.role(), other.content()),
        }
    }
}

/// Model stand-in that asks a human for help when the user asks for guidance, sums
/// "a + b" questions with `add_two_numbers`, and otherwise summarizes the last tool result.
#[derive(Debug, Default)]
pub struct RuleBasedLlm;

#[async_trait]
impl LlmClient for RuleBasedLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let last = messages
            .last()
            .ok_or_else(|| AgentError::ExecutionFailed("empty conversation".into()))?;
        match last {
            Message::Tool { content, .. } => Ok(LlmResponse::text(format!(
                "Based on the tool result: {}",
                content
            ))),
            Message::User { content } => {
                let lower = content.to_lowercase();
                if lower.contains("guidance") || lower.contains("help") {
                    return Ok(LlmResponse::tool_calls(vec![ToolCall::new(
                        format!("call-{}", messages.len()),
                        "human_assistance",
                        json!({ "query": content }),
                    )]));
                }
                if let Some((a, b)) = parse_sum(content) {
                    return Ok(LlmResponse::tool_calls(vec![ToolCall::new(
                        format!("call-{}", messages.len()),
                        "add_two_numbers",
                        json!({ "a": a, "b": b }),
                    )]));
                }
                Ok(LlmResponse::text(format!(
                    "You said: {} ({} messages so far)",
                    content,
                    messages.len()
                )))
            }
            other => Ok(LlmResponse::text(other.content().to_string())),
        }
    }
}

/// `add_two_numbers(a, b)`: returns the sum as text.
pub fn add_two_numbers_tool() -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        ToolSpec {
            name: "add_two_numbers".into(),
            description: Some("Add two integers and return the sum.".into()),
            input_schema: json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
                "required": ["a", "b"]
            }),
        },
        |input, _ctx| {
            let a = input["a"]
                .as_i64()
                .ok_or_else(|| ToolError::InvalidInput("a must be an integer".into()))?;
            let b = input["b"]
                .as_i64()
                .ok_or_else(|| ToolError::InvalidInput("b must be an integer".into()))?;
            Ok((a + b).to_string())
        },
    ))
}

/// `human_assistance(query)`: suspends the run with `{"query"}` and returns the `data` field
/// of the resume value.
pub fn human_assistance_tool() -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        ToolSpec {
            name: "human_assistance".into(),
            description: Some("Request assistance from a human.".into()),
            input_schema: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        },
        |input, ctx| {
            let response = ctx.interrupt(json!({ "query": input["query"] }))?;
            match response.get("data") {
                Some(Value::String(data)) => Ok(data.clone()),
                Some(other) => Ok(other.to_string()),
                None => Err(ToolError::InvalidInput(
                    "resume value needs a \"data\" field".into(),
                )),
            }
        },
    ))
}

/// Finds "a + b" with integer operands.
fn parse_sum(text: &str) -> Option<(i64, i64)> {
    let (left, right) = text.split_once('+')?;
    let a = left.split_whitespace().last()?.parse().ok()?;
    let b = right
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()?;
    Some((a, b))
}

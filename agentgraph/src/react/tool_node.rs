//! Tool node: read tool_calls, call the registry for each, append tool messages.
//!
//! # Error Handling
//!
//! Tool failures never fail the run. An unknown tool, invalid input or execution error
//! becomes a tool message with `is_error = true` so the next chat turn can correct itself:
//!
//! - `HandleToolErrors::Always(None)` - Default template with tool name, input and error
//! - `HandleToolErrors::Always(Some(msg))` - Fixed message
//! - `HandleToolErrors::Custom(handler)` - Custom error handler function
//!
//! A tool that calls `ToolCallContext::interrupt` suspends the run instead; on resume the
//! whole node re-executes, so tools before the interrupting one run again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::message::{Message, ToolCall};
use crate::state::{State, StateUpdate};
use crate::tool_source::{ToolCallContext, ToolError, ToolRegistry};

use super::{MESSAGES, TOOLS_NODE, TOOL_CALLS};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Default execution error message template with tool name and kwargs.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// Error handler function type.
///
/// Takes the error, tool name, and tool arguments, returns an error message string.
pub type ErrorHandlerFn = Arc<dyn Fn(&ToolError, &str, &Value) -> String + Send + Sync + 'static>;

/// How ToolNode renders a failed tool call into its error message.
#[derive(Clone)]
pub enum HandleToolErrors {
    /// Uses [`DEFAULT_EXECUTION_ERROR_TEMPLATE`] if None.
    Always(Option<String>),
    /// Custom error handler function.
    Custom(ErrorHandlerFn),
}

impl Default for HandleToolErrors {
    fn default() -> Self {
        Self::Always(None)
    }
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

impl HandleToolErrors {
    fn render(&self, error: &ToolError, tool_name: &str, tool_args: &Value) -> String {
        match self {
            Self::Always(custom_msg) => custom_msg.clone().unwrap_or_else(|| {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_kwargs}", &tool_args.to_string())
                    .replace("{error}", &error.to_string())
            }),
            Self::Custom(handler) => handler(error, tool_name, tool_args),
        }
    }
}

/// Tool node: executes the requested tool calls and produces tool messages.
///
/// Reads the `tool_calls` channel, calls `ToolRegistry::call(name, arguments)` for each in
/// request order, appends one `Message::Tool` per call and clears `tool_calls`.
///
/// **Interaction**: Implements `Node`; used by `ToolAgentConfig::build`. Consumes a
/// `ToolRegistry`; reads `messages` / `tool_calls`, writes both.
pub struct ToolNode {
    tools: ToolRegistry,
    handle_tool_errors: HandleToolErrors,
}

impl ToolNode {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::default(),
        }
    }

    /// Sets how failed calls are rendered (builder style).
    ///
    /// ```rust,ignore
    /// let tools = ToolNode::new(registry)
    ///     .with_handle_tool_errors(HandleToolErrors::Custom(Arc::new(|e, name, _args| {
    ///         format!("Tool {} failed: {}", name, e)
    ///     })));
    /// ```
    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    async fn call_one(&self, tc: &ToolCall, ctx: &ToolCallContext<'_>) -> Result<Message, AgentError> {
        debug!(tool = %tc.name, args = %tc.arguments, "Calling tool");
        match self.tools.call(&tc.name, tc.arguments.clone(), ctx).await {
            Ok(text) => {
                trace!(
                    tool = %tc.name,
                    result_len = text.len(),
                    result_preview = %truncate_for_log(&text, 200),
                    "Tool returned"
                );
                Ok(Message::tool(&tc.id, &tc.name, text))
            }
            Err(ToolError::Interrupted(interrupt)) => Err(AgentError::Interrupted(interrupt)),
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool call failed");
                let msg = self.handle_tool_errors.render(&e, &tc.name, &tc.arguments);
                Ok(Message::tool_error(&tc.id, &tc.name, msg))
            }
        }
    }
}

#[async_trait]
impl Node for ToolNode {
    fn id(&self) -> &str {
        TOOLS_NODE
    }

    async fn run(&self, state: &State, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let calls: Vec<ToolCall> = state.decode_or_default(TOOL_CALLS)?;
        let messages: Vec<Message> = state.decode_or_default(MESSAGES)?;
        let tool_ctx = ToolCallContext::new(&messages, ctx);

        let mut results = Vec::with_capacity(calls.len());
        for tc in &calls {
            results.push(self.call_one(tc, &tool_ctx).await?);
        }

        Ok(StateUpdate::new()
            .set_serialized(MESSAGES, &results)?
            .set(TOOL_CALLS, json!([])))
    }
}

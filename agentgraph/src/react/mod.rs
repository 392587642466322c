//! Tool-calling agent: chat node, tool node and the routing selector between them.
//!
//! The chat node calls the model; when the model requests tools, `tools_condition` routes to
//! the tool node, which appends one tool message per call and loops back to chat. The loop
//! ends when a chat turn requests no tools.

mod agent;
mod chat_node;
mod condition;
mod tool_node;

pub use agent::{user_input, ToolAgentConfig};
pub use chat_node::ChatNode;
pub use condition::tools_condition;
pub use tool_node::{ErrorHandlerFn, HandleToolErrors, ToolNode, DEFAULT_EXECUTION_ERROR_TEMPLATE};

/// Conversation channel (append policy): serialized `Message`s.
pub const MESSAGES: &str = "messages";

/// Tool requests of the last chat turn (overwrite policy): serialized `ToolCall`s.
pub const TOOL_CALLS: &str = "tool_calls";

/// Node id of [`ChatNode`] in agent graphs.
pub const CHAT_NODE: &str = "chat";

/// Node id of [`ToolNode`] in agent graphs; also the label `tools_condition` returns.
pub const TOOLS_NODE: &str = "tools";

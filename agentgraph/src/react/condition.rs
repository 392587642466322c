//! Routing selector for the chat → tools loop.

use serde_json::Value;

use crate::graph::END;
use crate::state::State;

use super::{TOOLS_NODE, TOOL_CALLS};

/// Returns `"tools"` when the `tool_calls` channel holds a non-empty array, otherwise `END`.
///
/// Use with `add_conditional_edges_to_nodes(CHAT_NODE, tools_condition)` or map the two
/// labels explicitly with `add_conditional_edges`.
pub fn tools_condition(state: &State) -> String {
    match state.get(TOOL_CALLS) {
        Some(Value::Array(calls)) if !calls.is_empty() => TOOLS_NODE.to_string(),
        _ => END.to_string(),
    }
}

//! Tool-calling agent graph: `START → chat ⇄ tools → END`.
//!
//! [`ToolAgentConfig`] is the explicit wiring object: the model client, the tool registry, an
//! optional checkpointer and the tool error policy go in, a compiled graph comes out.

use std::sync::Arc;

use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::memory::Checkpointer;
use crate::message::Message;
use crate::state::{ChannelPolicy, StateSchema, StateUpdate};
use crate::tool_source::ToolRegistry;

use super::{
    tools_condition, ChatNode, HandleToolErrors, ToolNode, CHAT_NODE, MESSAGES, TOOLS_NODE,
    TOOL_CALLS,
};

/// Collaborators for a tool-calling agent.
///
/// With an empty registry the graph is just `START → chat → END`.
///
/// ```rust,ignore
/// let graph = ToolAgentConfig::new(llm, registry)
///     .with_checkpointer(Arc::new(MemorySaver::new()))
///     .compile()?;
/// let out = graph.invoke(user_input("what is 2 + 3?"), Some(RunnableConfig::thread("1"))).await?;
/// ```
#[derive(Clone)]
pub struct ToolAgentConfig {
    pub llm: Arc<dyn LlmClient>,
    pub tools: ToolRegistry,
    pub checkpointer: Option<Arc<dyn Checkpointer>>,
    pub handle_tool_errors: HandleToolErrors,
}

impl ToolAgentConfig {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            checkpointer: None,
            handle_tool_errors: HandleToolErrors::default(),
        }
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    /// `messages` appends, `tool_calls` overwrites.
    pub fn schema() -> StateSchema {
        StateSchema::new()
            .channel(MESSAGES, ChannelPolicy::Append)
            .channel(TOOL_CALLS, ChannelPolicy::Overwrite)
    }

    /// Builds the uncompiled graph so callers can add nodes or edges before compiling.
    pub fn build(&self) -> StateGraph {
        let mut graph = StateGraph::with_schema(Self::schema());
        graph.add_node(CHAT_NODE, Arc::new(ChatNode::new(self.llm.clone())));
        graph.add_edge(START, CHAT_NODE);

        if self.tools.is_empty() {
            graph.add_edge(CHAT_NODE, END);
            return graph;
        }

        let tools = ToolNode::new(self.tools.clone())
            .with_handle_tool_errors(self.handle_tool_errors.clone());
        graph.add_node(TOOLS_NODE, Arc::new(tools));
        graph.add_conditional_edges(
            CHAT_NODE,
            tools_condition,
            [(TOOLS_NODE, TOOLS_NODE), (END, END)],
        );
        graph.add_edge(TOOLS_NODE, CHAT_NODE);
        graph
    }

    /// Builds and compiles, attaching the checkpointer when set.
    pub fn compile(&self) -> Result<CompiledStateGraph, CompilationError> {
        let graph = self.build();
        match &self.checkpointer {
            Some(cp) => graph.compile_with_checkpointer(cp.clone()),
            None => graph.compile(),
        }
    }
}

/// Input update appending one user message.
pub fn user_input(text: impl Into<String>) -> StateUpdate {
    StateUpdate::new().set(MESSAGES, serde_json::json!([Message::user(text)]))
}

//! Tool registry collaborator used by `ToolNode`.
//!
//! A [`Tool`] declares a name and input shape ([`ToolSpec`]) and is called with structured
//! JSON input. [`ToolRegistry`] looks tools up by name and checks the declared required
//! input keys before calling. Concrete tools live with the caller; [`FnTool`] wraps a closure.

mod context;
mod registry;

pub use context::ToolCallContext;
pub use registry::{FnTool, ToolRegistry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::graph::Interrupt;

/// Declared name, description and JSON input schema of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema of the input object; `required` keys are checked by the registry.
    pub input_schema: Value,
}

/// Tool invocation failure. `ToolNode` folds every variant except `Interrupted` into an
/// error-annotated tool message.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Execution(String),
    /// The tool asked for external input; the run suspends.
    #[error("interrupted: {}", .0.value)]
    Interrupted(Interrupt),
}

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    /// Runs the tool with its structured input; returns the textual result.
    async fn call(&self, input: Value, ctx: &ToolCallContext<'_>) -> Result<String, ToolError>;
}

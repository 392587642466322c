//! Name → tool lookup with input validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolCallContext, ToolError, ToolSpec};

/// Tools by name. Cloning shares the tool instances.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its spec name; replaces a tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.spec().name, tool);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Specs of all registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up `name`, checks `input` against the declared required keys, and calls it.
    /// A `null` input is treated as an empty object.
    pub async fn call(
        &self,
        name: &str,
        input: Value,
        ctx: &ToolCallContext<'_>,
    ) -> Result<String, ToolError> {
        let tool = self
            .lookup(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let input = match input {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        check_required(&tool.spec(), &input)?;
        tool.call(input, ctx).await
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn check_required(spec: &ToolSpec, input: &Value) -> Result<(), ToolError> {
    let object = input
        .as_object()
        .ok_or_else(|| ToolError::InvalidInput(format!("expected a JSON object, got {}", input)))?;
    let required = spec
        .input_schema
        .get("required")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let missing: Vec<&str> = required
        .iter()
        .filter_map(Value::as_str)
        .filter(|key| !object.contains_key(*key))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ToolError::InvalidInput(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

type ToolFn = dyn Fn(Value, &ToolCallContext<'_>) -> Result<String, ToolError> + Send + Sync;

/// Tool built from a synchronous closure.
pub struct FnTool {
    spec: ToolSpec,
    f: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(spec: ToolSpec, f: F) -> Self
    where
        F: Fn(Value, &ToolCallContext<'_>) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self {
            spec,
            f: Box::new(f),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, input: Value, ctx: &ToolCallContext<'_>) -> Result<String, ToolError> {
        (self.f)(input, ctx)
    }
}

//! Node contract: state in, partial update out.

use std::fmt;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::RunContext;
use crate::state::{State, StateUpdate};

/// A named computation unit in a graph.
///
/// Receives the merged state by reference and returns only the channels it changes.
/// Returning `Err(AgentError::Interrupted)` (via [`RunContext::interrupt`]) suspends the run
/// with nothing from this attempt merged.
///
/// **Interaction**: Registered with `StateGraph::add_node`; invoked by `CompiledStateGraph`
/// once per superstep.
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id, used in logs. The id passed to `add_node` is what edges refer to.
    fn id(&self) -> &str;

    async fn run(&self, state: &State, ctx: &RunContext) -> Result<StateUpdate, AgentError>;
}

type NodeFn = dyn Fn(&State, &RunContext) -> Result<StateUpdate, AgentError> + Send + Sync;

/// Node built from a synchronous closure. Suits pure state transforms and tests.
pub struct FnNode {
    id: String,
    f: Box<NodeFn>,
}

impl FnNode {
    pub fn new<F>(id: impl Into<String>, f: F) -> Self
    where
        F: Fn(&State, &RunContext) -> Result<StateUpdate, AgentError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            f: Box::new(f),
        }
    }
}

impl fmt::Debug for FnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNode").field("id", &self.id).finish()
    }
}

#[async_trait]
impl Node for FnNode {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, state: &State, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        (self.f)(state, ctx)
    }
}

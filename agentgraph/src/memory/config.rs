//! Invoke config: thread_id and recursion_limit.
//!
//! Passed to `CompiledStateGraph::invoke` / `resume` / `get_state` and used to key the
//! checkpointer.

/// Supersteps allowed per `invoke` / `resume` call when no limit is configured.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Config for a single invoke. Identifies the thread and bounds the run.
///
/// When the graph has a checkpointer, `thread_id` is required.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(input, config)`; copied into the
/// `RunContext` each node receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread. Required when using a checkpointer.
    pub thread_id: Option<String>,
    /// Max supersteps per call; `None` means [`DEFAULT_RECURSION_LIMIT`].
    pub recursion_limit: Option<usize>,
}

impl RunnableConfig {
    /// Config for the given thread with the default recursion limit.
    pub fn thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    /// Effective recursion limit.
    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit.unwrap_or(DEFAULT_RECURSION_LIMIT)
    }
}

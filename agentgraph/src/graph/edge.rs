//! Outgoing edges of a node: one direct target, or one selector with its branch table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::state::State;

/// Maps the post-merge state to a routing label.
pub type Selector = Arc<dyn Fn(&State) -> String + Send + Sync>;

/// Outgoing edge group of one source node.
#[derive(Clone)]
pub enum Edge {
    /// Always taken after the source runs.
    Direct(String),
    /// `selector` picks a label; `branches` maps label → target. When `branches` is `None`
    /// the label is itself the target node id (or `END`).
    Conditional {
        selector: Selector,
        branches: Option<BTreeMap<String, String>>,
    },
}

impl Edge {
    /// Targets known without evaluating a selector.
    pub(crate) fn static_targets(&self) -> Vec<&str> {
        match self {
            Edge::Direct(to) => vec![to.as_str()],
            Edge::Conditional {
                branches: Some(map),
                ..
            } => map.values().map(String::as_str).collect(),
            Edge::Conditional { branches: None, .. } => Vec::new(),
        }
    }

    /// True for a conditional group whose labels name nodes directly.
    pub(crate) fn routes_by_label(&self) -> bool {
        matches!(self, Edge::Conditional { branches: None, .. })
    }

    /// Evaluates the edge against `state`. Returns the label on failure to map it.
    pub(crate) fn resolve(&self, state: &State) -> Result<String, String> {
        match self {
            Edge::Direct(to) => Ok(to.clone()),
            Edge::Conditional { selector, branches } => {
                let label = selector(state);
                match branches {
                    Some(map) => map.get(&label).cloned().ok_or(label),
                    None => Ok(label),
                }
            }
        }
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("branches", branches)
                .finish_non_exhaustive(),
        }
    }
}

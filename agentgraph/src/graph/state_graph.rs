//! State graph: nodes, channels and edges (direct or conditional).
//!
//! Declare channels with `add_channel` (or `with_schema`), add nodes with `add_node`, wire
//! them with `add_edge(from, to)` / `add_conditional_edges(from, selector, branches)` using
//! `START` and `END` for entry/exit, then `compile` or `compile_with_checkpointer` to get a
//! `CompiledStateGraph`. Cycles are allowed; the recursion limit bounds them at run time.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::edge::{Edge, Selector};
use crate::graph::node::{FnNode, Node};
use crate::graph::RunContext;
use crate::memory::Checkpointer;
use crate::state::{ChannelPolicy, State, StateSchema, StateUpdate};

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as a target, e.g. `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Mutable graph definition.
///
/// Build with `add_node` / `add_edge` / `add_conditional_edges`, then `compile()`. Cloning a
/// builder shares node instances (they are `Arc`s).
///
/// **Interaction**: Accepts `Arc<dyn Node>`; produces `CompiledStateGraph`.
#[derive(Clone, Default)]
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    /// Edge groups in declaration order, keyed by source id.
    edges: Vec<(String, Edge)>,
    schema: StateSchema,
}

impl StateGraph {
    /// Creates an empty graph; every channel defaults to overwrite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given channel schema.
    pub fn with_schema(schema: StateSchema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Declares a channel's merge policy. Undeclared channels overwrite.
    pub fn add_channel(&mut self, name: impl Into<String>, policy: ChannelPolicy) -> &mut Self {
        self.schema.declare(name, policy);
        self
    }

    /// Adds a node; replaces an existing node with the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds a node from a synchronous closure (see [`FnNode`]).
    pub fn add_fn_node<F>(&mut self, id: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&State, &RunContext) -> Result<StateUpdate, AgentError> + Send + Sync + 'static,
    {
        let id = id.into();
        let node = Arc::new(FnNode::new(id.clone(), f));
        self.add_node(id, node)
    }

    /// Adds a direct edge from `from_id` to `to_id`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges
            .push((from_id.into(), Edge::Direct(to_id.into())));
        self
    }

    /// Adds a conditional edge group: after `from_id` runs, `selector` maps the merged state
    /// to a label and `branches` maps the label to the next node (or `END`). A label missing
    /// from `branches` fails the run with a routing error.
    pub fn add_conditional_edges<F, I, K, V>(
        &mut self,
        from_id: impl Into<String>,
        selector: F,
        branches: I,
    ) -> &mut Self
    where
        F: Fn(&State) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let branches: BTreeMap<String, String> = branches
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let selector: Selector = Arc::new(selector);
        self.edges.push((
            from_id.into(),
            Edge::Conditional {
                selector,
                branches: Some(branches),
            },
        ));
        self
    }

    /// Adds a conditional edge group whose labels are node ids (or `END`) themselves.
    pub fn add_conditional_edges_to_nodes<F>(
        &mut self,
        from_id: impl Into<String>,
        selector: F,
    ) -> &mut Self
    where
        F: Fn(&State) -> String + Send + Sync + 'static,
    {
        let selector: Selector = Arc::new(selector);
        self.edges.push((
            from_id.into(),
            Edge::Conditional {
                selector,
                branches: None,
            },
        ));
        self
    }

    /// Channel schema declared so far.
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// Validates the graph and freezes it for execution without persistence.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(None)
    }

    /// Validates the graph and attaches a checkpointer; runs then need `config.thread_id`.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_internal(Some(checkpointer))
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer>>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        for id in self.nodes.keys() {
            if id == START || id == END {
                return Err(CompilationError::ReservedName(id.clone()));
            }
        }

        let mut entry: Option<String> = None;
        let mut outgoing: HashMap<String, Edge> = HashMap::new();
        for (from, edge) in self.edges {
            if from == END {
                return Err(CompilationError::InvalidEdge(
                    "END cannot be the source of an edge".into(),
                ));
            }
            if from != START && !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            for to in edge.static_targets() {
                if to == START {
                    return Err(CompilationError::InvalidEdge(format!(
                        "'{}' cannot route back to START",
                        from
                    )));
                }
                if to != END && !self.nodes.contains_key(to) {
                    return Err(CompilationError::NodeNotFound(to.to_string()));
                }
            }

            if from == START {
                match edge {
                    Edge::Direct(to) if entry.is_none() => entry = Some(to),
                    Edge::Direct(_) => return Err(CompilationError::MultipleStart),
                    Edge::Conditional { .. } => {
                        return Err(CompilationError::InvalidEdge(
                            "START takes a single direct edge".into(),
                        ))
                    }
                }
                continue;
            }

            if let Some(existing) = outgoing.get(&from) {
                let both_direct = matches!((existing, &edge), (Edge::Direct(_), Edge::Direct(_)));
                return Err(if both_direct {
                    CompilationError::DuplicateEdge(from)
                } else {
                    CompilationError::ConflictingEdges(from)
                });
            }
            outgoing.insert(from, edge);
        }
        let entry = entry.ok_or(CompilationError::MissingStart)?;

        let reachable = reachable_from(&entry, &outgoing, &self.nodes)?;
        let mut unreachable: Vec<&String> = self
            .nodes
            .keys()
            .filter(|id| !reachable.contains(id.as_str()))
            .collect();
        unreachable.sort();
        for id in unreachable {
            tracing::warn!(node_id = %id, "Node is not reachable from START");
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            edges: outgoing,
            entry,
            schema: self.schema,
            checkpointer,
        })
    }
}

/// Walks the edge table from `entry` and checks every reached node has an outgoing edge.
///
/// A label-routed conditional group may reach any node, so reaching one marks all nodes.
fn reachable_from(
    entry: &str,
    outgoing: &HashMap<String, Edge>,
    nodes: &HashMap<String, Arc<dyn Node>>,
) -> Result<HashSet<String>, CompilationError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::from([entry.to_string()]);
    while let Some(id) = queue.pop_front() {
        if id == END || !seen.insert(id.clone()) {
            continue;
        }
        let edge = outgoing
            .get(&id)
            .ok_or_else(|| CompilationError::DeadEnd(id.clone()))?;
        if edge.routes_by_label() {
            queue.extend(nodes.keys().cloned());
        } else {
            queue.extend(edge.static_targets().into_iter().map(str::to_string));
        }
    }
    Ok(seen)
}

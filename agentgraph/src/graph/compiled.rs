//! Compiled state graph: immutable, supports invoke, resume, stream and get_state.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Runs one node per
//! superstep: execute, merge its update by channel policy, route along the node's edge
//! group, persist, repeat until END, an interrupt, an error or the recursion limit.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use serde_json::Value;

use crate::error::{AgentError, GraphError};
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer, RunnableConfig};
use crate::state::{State, StateSchema, StateUpdate};
use crate::stream::{StreamEvent, StreamMode};

use super::edge::Edge;
use super::logging::{
    log_checkpoint_saved, log_graph_complete, log_graph_error, log_graph_start, log_interrupt,
    log_node_complete, log_node_start,
};
use super::{Command, Node, RunContext, RunResult, RunStatus, ThreadStatus, END};

/// Compiled graph: immutable structure, cheap to clone, safe to share across tasks.
///
/// Created by `StateGraph::compile()` or `compile_with_checkpointer()`. Concurrent runs on
/// distinct thread ids are independent. When a checkpointer is set every call needs
/// `config.thread_id`, and a checkpoint is written after each superstep.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) nodes: HashMap<String, Arc<dyn Node>>,
    pub(super) edges: HashMap<String, Edge>,
    pub(super) entry: String,
    pub(super) schema: StateSchema,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer>>,
}

/// Where a run picks up: state, node to execute, steps so far, replayed resume values.
struct Cursor {
    thread_id: Option<String>,
    state: State,
    position: String,
    step: u64,
    resume_values: Vec<Value>,
}

/// Event channel for `stream` / `stream_resume`.
struct EventSink {
    tx: mpsc::Sender<Result<StreamEvent, GraphError>>,
    modes: HashSet<StreamMode>,
}

impl EventSink {
    async fn step(&self, node_id: &str, update: StateUpdate, state: &State) {
        if self.modes.contains(&StreamMode::Values) {
            let _ = self.tx.send(Ok(StreamEvent::Values(state.clone()))).await;
        }
        if self.modes.contains(&StreamMode::Updates) {
            let _ = self
                .tx
                .send(Ok(StreamEvent::Updates {
                    node_id: node_id.to_string(),
                    update,
                }))
                .await;
        }
    }
}

impl CompiledStateGraph {
    /// Shared run loop used by invoke/resume/stream: one node per superstep until END or
    /// suspension.
    async fn run_loop(
        &self,
        cursor: Cursor,
        config: &RunnableConfig,
        sink: Option<&EventSink>,
    ) -> Result<RunResult, GraphError> {
        let Cursor {
            thread_id,
            mut state,
            mut position,
            mut step,
            mut resume_values,
        } = cursor;
        let thread_id = thread_id.as_deref();
        let limit = config.recursion_limit();
        let mut steps = 0usize;

        loop {
            if position == END {
                let checkpoint =
                    Checkpoint::from_state(state.clone(), END, CheckpointSource::Exit, step);
                self.save(thread_id, &checkpoint).await?;
                log_graph_complete(thread_id, steps);
                return Ok(RunResult {
                    state,
                    status: RunStatus::Done,
                    steps,
                });
            }
            if steps >= limit {
                return Err(GraphError::RecursionLimit(limit));
            }

            let node = self
                .nodes
                .get(&position)
                .cloned()
                .ok_or_else(|| GraphError::UnknownNode(position.clone()))?;
            log_node_start(&position, step);
            let ctx = RunContext::new(
                position.clone(),
                config.clone(),
                std::mem::take(&mut resume_values),
            );

            let update = match node.run(&state, &ctx).await {
                Ok(update) => update,
                Err(AgentError::Interrupted(interrupt)) => {
                    log_interrupt(&position, &interrupt);
                    let checkpoint = Checkpoint::from_state(
                        state.clone(),
                        position.clone(),
                        CheckpointSource::Interrupt,
                        step,
                    )
                    .with_interrupt(interrupt.clone(), ctx.into_resume_values());
                    self.save(thread_id, &checkpoint).await?;
                    if let Some(sink) = sink {
                        let _ = sink
                            .tx
                            .send(Ok(StreamEvent::Interrupt {
                                node_id: position.clone(),
                                interrupt: interrupt.clone(),
                            }))
                            .await;
                    }
                    return Ok(RunResult {
                        state,
                        status: RunStatus::Interrupted {
                            node: position,
                            interrupt,
                        },
                        steps,
                    });
                }
                Err(source) => {
                    return Err(GraphError::Node {
                        node: position,
                        source,
                    })
                }
            };

            let merged = state.merge(&self.schema, update.clone());
            let next = self.next_node(&position, &merged)?;
            state = merged;
            step += 1;
            steps += 1;

            let checkpoint =
                Checkpoint::from_state(state.clone(), next.clone(), CheckpointSource::Loop, step);
            self.save(thread_id, &checkpoint).await?;
            log_node_complete(&position, &next);
            if let Some(sink) = sink {
                sink.step(&position, update, &state).await;
            }
            position = next;
        }
    }

    /// Routes from `current` along its edge group against the merged state.
    fn next_node(&self, current: &str, state: &State) -> Result<String, GraphError> {
        let edge = self.edges.get(current).ok_or_else(|| GraphError::Routing {
            node: current.to_string(),
            label: String::new(),
        })?;
        match edge.resolve(state) {
            Ok(target) if target == END || self.nodes.contains_key(&target) => Ok(target),
            Ok(label) | Err(label) => Err(GraphError::Routing {
                node: current.to_string(),
                label,
            }),
        }
    }

    async fn save(&self, thread_id: Option<&str>, checkpoint: &Checkpoint) -> Result<(), GraphError> {
        if let (Some(cp), Some(thread_id)) = (&self.checkpointer, thread_id) {
            cp.put(thread_id, checkpoint).await?;
            log_checkpoint_saved(thread_id, checkpoint.step(), &checkpoint.pending_node);
        }
        Ok(())
    }

    /// Thread id to persist under: required with a checkpointer, ignored without one.
    fn thread_id(&self, config: &RunnableConfig) -> Result<Option<String>, GraphError> {
        match (&self.checkpointer, &config.thread_id) {
            (Some(_), None) => Err(GraphError::MissingThreadId),
            (Some(_), Some(id)) => Ok(Some(id.clone())),
            (None, _) => Ok(None),
        }
    }

    /// Cursor for `invoke`: input merged onto the thread's latest state, starting at entry.
    async fn start_cursor(
        &self,
        input: StateUpdate,
        config: &RunnableConfig,
    ) -> Result<Cursor, GraphError> {
        let thread_id = self.thread_id(config)?;
        let previous = match (&self.checkpointer, thread_id.as_deref()) {
            (Some(cp), Some(id)) => cp.get(id).await?,
            _ => None,
        };
        let (state, step) = previous
            .map(|cp| {
                let step = cp.step();
                (cp.state, step)
            })
            .unwrap_or_default();
        Ok(Cursor {
            thread_id,
            state: state.merge(&self.schema, input),
            position: self.entry.clone(),
            step,
            resume_values: Vec::new(),
        })
    }

    /// Cursor for `resume`: the suspended node, with the new value appended to those it
    /// already consumed.
    async fn resume_cursor(
        &self,
        command: Command,
        config: &RunnableConfig,
    ) -> Result<Cursor, GraphError> {
        let checkpointer = self.checkpointer.as_ref().ok_or(GraphError::NoCheckpointer)?;
        let thread_id = config
            .thread_id
            .clone()
            .ok_or(GraphError::MissingThreadId)?;
        let checkpoint = checkpointer
            .get(&thread_id)
            .await?
            .filter(|cp| cp.pending_interrupt.is_some())
            .ok_or_else(|| GraphError::NotSuspended(thread_id.clone()))?;
        if !self.nodes.contains_key(&checkpoint.pending_node) {
            return Err(GraphError::UnknownNode(checkpoint.pending_node));
        }
        let step = checkpoint.step();
        let mut resume_values = checkpoint.resume_values;
        resume_values.push(command.resume);
        Ok(Cursor {
            thread_id: Some(thread_id),
            state: checkpoint.state,
            position: checkpoint.pending_node,
            step,
            resume_values,
        })
    }

    /// Cursor for `continue_run`: the node a failed run stopped before, on the state saved
    /// by the last completed superstep.
    async fn continue_cursor(&self, config: &RunnableConfig) -> Result<Cursor, GraphError> {
        let checkpointer = self.checkpointer.as_ref().ok_or(GraphError::NoCheckpointer)?;
        let thread_id = config
            .thread_id
            .clone()
            .ok_or(GraphError::MissingThreadId)?;
        let checkpoint = checkpointer
            .get(&thread_id)
            .await?
            .filter(|cp| cp.status() == ThreadStatus::Running)
            .ok_or_else(|| GraphError::NotRunning(thread_id.clone()))?;
        if !self.nodes.contains_key(&checkpoint.pending_node) {
            return Err(GraphError::UnknownNode(checkpoint.pending_node));
        }
        let step = checkpoint.step();
        Ok(Cursor {
            thread_id: Some(thread_id),
            state: checkpoint.state,
            position: checkpoint.pending_node,
            step,
            resume_values: Vec::new(),
        })
    }

    /// Runs the graph from the entry node with `input` merged onto the thread's state.
    ///
    /// With a checkpointer the thread's latest state is loaded first (conversation memory),
    /// and a pending interrupt on the thread is discarded. Returns when the run reaches END
    /// or suspends; see [`RunResult::status`].
    pub async fn invoke(
        &self,
        input: StateUpdate,
        config: Option<RunnableConfig>,
    ) -> Result<RunResult, GraphError> {
        let config = config.unwrap_or_default();
        log_graph_start(config.thread_id.as_deref(), false);
        let result = match self.start_cursor(input, &config).await {
            Ok(cursor) => self.run_loop(cursor, &config, None).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_graph_error(e);
        }
        result
    }

    /// Continues a suspended thread: the pending node re-executes from its start and its
    /// pending interrupt call returns `command.resume`.
    ///
    /// Fails with `NotSuspended` when the thread has no checkpoint or no pending interrupt.
    pub async fn resume(
        &self,
        command: Command,
        config: RunnableConfig,
    ) -> Result<RunResult, GraphError> {
        log_graph_start(config.thread_id.as_deref(), true);
        let result = match self.resume_cursor(command, &config).await {
            Ok(cursor) => self.run_loop(cursor, &config, None).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_graph_error(e);
        }
        result
    }

    /// Retries a thread left mid-run by a fatal error (node failure, persistence failure,
    /// recursion limit): execution restarts at the checkpoint's pending node on its saved
    /// state, so nodes that already completed do not run again.
    ///
    /// Fails with `NotRunning` when the thread has no checkpoint, is suspended (use
    /// [`resume`](Self::resume)) or already reached END.
    pub async fn continue_run(&self, config: RunnableConfig) -> Result<RunResult, GraphError> {
        log_graph_start(config.thread_id.as_deref(), true);
        let result = match self.continue_cursor(&config).await {
            Ok(cursor) => self.run_loop(cursor, &config, None).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log_graph_error(e);
        }
        result
    }

    /// Streams graph execution, emitting events via channel-backed Stream.
    ///
    /// A fatal error is sent as the last item; a suspension ends the stream after an
    /// `Interrupt` event.
    pub fn stream(
        &self,
        input: StateUpdate,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<Result<StreamEvent, GraphError>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let sink = EventSink {
            tx,
            modes: stream_mode.into(),
        };
        let config = config.unwrap_or_default();

        tokio::spawn(async move {
            log_graph_start(config.thread_id.as_deref(), false);
            let result = match graph.start_cursor(input, &config).await {
                Ok(cursor) => graph.run_loop(cursor, &config, Some(&sink)).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log_graph_error(&e);
                let _ = sink.tx.send(Err(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Streaming variant of [`resume`](Self::resume).
    pub fn stream_resume(
        &self,
        command: Command,
        config: RunnableConfig,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<Result<StreamEvent, GraphError>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let sink = EventSink {
            tx,
            modes: stream_mode.into(),
        };

        tokio::spawn(async move {
            log_graph_start(config.thread_id.as_deref(), true);
            let result = match graph.resume_cursor(command, &config).await {
                Ok(cursor) => graph.run_loop(cursor, &config, Some(&sink)).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log_graph_error(&e);
                let _ = sink.tx.send(Err(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }

    /// Latest checkpoint of `config.thread_id`, or `None` for an unknown thread.
    pub async fn get_state(&self, config: &RunnableConfig) -> Result<Option<Checkpoint>, GraphError> {
        let checkpointer = self.checkpointer.as_ref().ok_or(GraphError::NoCheckpointer)?;
        let thread_id = config
            .thread_id
            .as_deref()
            .ok_or(GraphError::MissingThreadId)?;
        Ok(checkpointer.get(thread_id).await?)
    }

    /// Channel schema the graph merges updates with.
    pub fn schema(&self) -> &StateSchema {
        &self.schema
    }

    /// The checkpointer, if compiled with one.
    pub fn checkpointer(&self) -> Option<&Arc<dyn Checkpointer>> {
        self.checkpointer.as_ref()
    }
}

//! invoke: supersteps to END, append order, recursion limit, thread memory, concurrency.

use std::sync::Arc;

use agentgraph::{
    ChannelPolicy, GraphError, MemorySaver, RunnableConfig, State, StateGraph, StateUpdate,
    ThreadStatus, END, START,
};
use serde_json::json;

use crate::common::{add, LogNode};

fn log_of(state: &State) -> Vec<String> {
    state.decode_or_default("log").unwrap()
}

/// **Scenario**: A linear graph runs each node once and terminates with Done.
#[tokio::test]
async fn linear_graph_runs_to_end() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("double", |state: &State, _: &agentgraph::RunContext| {
        let n = state.get("n").and_then(|v| v.as_i64()).unwrap_or(0);
        Ok(StateUpdate::new().set("n", n * 2))
    });
    graph.add_fn_node("inc", add(1));
    graph.add_edge(START, "double").add_edge("double", "inc").add_edge("inc", END);
    let compiled = graph.compile().unwrap();

    let out = compiled
        .invoke(StateUpdate::new().set("n", 5), None)
        .await
        .unwrap();
    assert!(out.is_done());
    assert_eq!(out.steps, 2);
    assert_eq!(out.state.get("n"), Some(&json!(11)));
}

/// **Scenario**: Append channels keep insertion order across supersteps; overwrite channels
/// keep the last value.
#[tokio::test]
async fn append_channel_preserves_order() {
    let (a, b, c) = (LogNode::new("a"), LogNode::new("b"), LogNode::new("c"));
    let mut graph = StateGraph::new();
    graph.add_channel("log", ChannelPolicy::Append);
    graph
        .add_node("a", a.clone())
        .add_node("b", b.clone())
        .add_node("c", c.clone());
    graph
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", "c")
        .add_edge("c", END);
    let compiled = graph.compile().unwrap();

    let out = compiled
        .invoke(StateUpdate::new().set("log", json!(["input"])), None)
        .await
        .unwrap();
    assert_eq!(log_of(&out.state), vec!["input", "a", "b", "c"]);
    assert_eq!((a.visits(), b.visits(), c.visits()), (1, 1, 1));
}

/// **Scenario**: A cycle with no exit stops at the recursion limit; the last checkpoint
/// remains and points at the next node.
#[tokio::test]
async fn cycle_hits_recursion_limit() {
    let saver = Arc::new(MemorySaver::new());
    let mut graph = StateGraph::new();
    graph.add_fn_node("a", add(1)).add_fn_node("b", add(1));
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", "a");
    let compiled = graph.compile_with_checkpointer(saver).unwrap();

    let config = RunnableConfig::thread("loop").with_recursion_limit(3);
    let err = compiled
        .invoke(StateUpdate::new(), Some(config.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimit(3)), "{err:?}");

    let checkpoint = compiled.get_state(&config).await.unwrap().unwrap();
    assert_eq!(checkpoint.step(), 3);
    assert_eq!(checkpoint.pending_node, "b");
    assert_eq!(checkpoint.state.get("n"), Some(&json!(3)));
    assert_eq!(checkpoint.status(), ThreadStatus::Running);
}

/// **Scenario**: Two invokes on the same thread share state; a different thread starts empty.
#[tokio::test]
async fn thread_state_carries_across_invokes() {
    let saver = Arc::new(MemorySaver::new());
    let mut graph = StateGraph::new();
    graph.add_channel("log", ChannelPolicy::Append);
    graph.add_node("a", LogNode::new("a"));
    graph.add_edge(START, "a").add_edge("a", END);
    let compiled = graph.compile_with_checkpointer(saver).unwrap();

    let t1 = RunnableConfig::thread("t1");
    compiled.invoke(StateUpdate::new(), Some(t1.clone())).await.unwrap();
    let second = compiled.invoke(StateUpdate::new(), Some(t1.clone())).await.unwrap();
    assert_eq!(log_of(&second.state), vec!["a", "a"]);

    let other = compiled
        .invoke(StateUpdate::new(), Some(RunnableConfig::thread("t2")))
        .await
        .unwrap();
    assert_eq!(log_of(&other.state), vec!["a"]);

    let checkpoint = compiled.get_state(&t1).await.unwrap().unwrap();
    assert_eq!(checkpoint.status(), ThreadStatus::Terminated);
    assert_eq!(checkpoint.step(), 2);
}

/// **Scenario**: With a checkpointer, invoke without thread_id is rejected before any node runs.
#[tokio::test]
async fn checkpointer_requires_thread_id() {
    let node = LogNode::new("a");
    let mut graph = StateGraph::new();
    graph.add_node("a", node.clone());
    graph.add_edge(START, "a").add_edge("a", END);
    let compiled = graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap();

    let err = compiled.invoke(StateUpdate::new(), None).await.unwrap_err();
    assert!(matches!(err, GraphError::MissingThreadId));
    assert_eq!(node.visits(), 0);
}

/// **Scenario**: Concurrent runs of one compiled graph on distinct threads do not interfere.
#[tokio::test]
async fn concurrent_threads_are_independent() {
    let mut graph = StateGraph::new();
    graph.add_channel("log", ChannelPolicy::Append);
    graph.add_node("a", LogNode::new("a")).add_node("b", LogNode::new("b"));
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);
    let compiled = graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let compiled = compiled.clone();
            tokio::spawn(async move {
                let thread = format!("thread-{i}");
                let input = StateUpdate::new().set("log", format!("in-{i}"));
                compiled
                    .invoke(input, Some(RunnableConfig::thread(thread)))
                    .await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(log_of(&out.state), vec![format!("in-{i}"), "a".into(), "b".into()]);
    }
    let threads = compiled.checkpointer().unwrap().list_threads().await.unwrap();
    assert_eq!(threads.len(), 8);
}

//! StateGraph compile failure cases: unknown node, entry problems, dead ends.

use agentgraph::{CompilationError, State, StateGraph, StateUpdate, END, START};

use crate::common::add;

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("echo", add(1));
    graph.add_edge(START, "echo");
    graph.add_edge("echo", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("a", add(1));
    graph.add_edge("a", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MissingStart));
}

#[tokio::test]
async fn compile_fails_with_two_start_edges() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("a", add(1)).add_fn_node("b", add(2));
    graph.add_edge(START, "a").add_edge(START, "b");
    graph.add_edge("a", END).add_edge("b", END);
    assert_eq!(graph.compile().err(), Some(CompilationError::MultipleStart));
}

/// **Scenario**: A node reachable only through a mapped branch still needs an outgoing edge.
#[tokio::test]
async fn compile_fails_on_dead_end_behind_branch() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("a", add(1)).add_fn_node("b", add(2));
    graph.add_edge(START, "a");
    graph.add_conditional_edges("a", |_: &State| "b".to_string(), [("b", "b"), ("done", END)]);
    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DeadEnd("b".into()))
    );
}

/// **Scenario**: Compiling the same definition twice gives equivalent graphs.
#[tokio::test]
async fn compile_is_repeatable() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("a", add(1)).add_fn_node("b", add(10));
    graph.add_edge(START, "a").add_edge("a", "b").add_edge("b", END);

    let first = graph.clone().compile().unwrap();
    let second = graph.compile().unwrap();
    let input = StateUpdate::new().set("n", 1);
    let a = first.invoke(input.clone(), None).await.unwrap();
    let b = second.invoke(input, None).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.state.get("n").and_then(|v| v.as_i64()), Some(12));
}

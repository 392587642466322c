//! Interrupt and resume: suspension, resume in a fresh process, multiple interrupts,
//! NotSuspended and streaming.

use std::sync::Arc;

use agentgraph::{
    user_input, ChannelPolicy, Command, GraphError, LlmResponse, MemorySaver, Message, MockLlm, RunContext,
    RunnableConfig, SqliteSaver, State, StateGraph, StateUpdate, StreamEvent, StreamMode,
    ThreadStatus, ToolAgentConfig, ToolCall, ToolRegistry, END, START,
};
use serde_json::{json, Value};
use tokio_stream::StreamExt;

use crate::common::{human_assistance_tool, messages};

fn assistance_agent(llm: MockLlm, db: &std::path::Path) -> agentgraph::CompiledStateGraph {
    let saver = SqliteSaver::open(db).unwrap();
    ToolAgentConfig::new(
        Arc::new(llm),
        ToolRegistry::new().with_tool(human_assistance_tool()),
    )
    .with_checkpointer(Arc::new(saver))
    .compile()
    .unwrap()
}

/// **Scenario**: A tool asks a human; the run suspends at the tool node. A new checkpointer
/// and a new compiled graph over the same database resume it to completion.
#[tokio::test]
async fn human_assistance_resumes_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("checkpoints.db");
    let config = RunnableConfig::thread("1");

    {
        let llm = MockLlm::new(vec![LlmResponse::tool_calls(vec![ToolCall::new(
            "call-1",
            "human_assistance",
            json!({"query": "I need expert guidance for building an AI agent."}),
        )])]);
        let compiled = assistance_agent(llm, &db);
        let out = compiled
            .invoke(user_input("I need some expert guidance."), Some(config.clone()))
            .await
            .unwrap();

        assert!(!out.is_done());
        assert_eq!(out.pending_node(), Some("tools"));
        assert_eq!(
            out.interrupt(),
            Some(&json!({"query": "I need expert guidance for building an AI agent."}))
        );
        let checkpoint = compiled.get_state(&config).await.unwrap().unwrap();
        assert_eq!(checkpoint.status(), ThreadStatus::Suspended);
        assert_eq!(checkpoint.pending_node, "tools");
    }

    let llm = MockLlm::new(vec![LlmResponse::text("Use a graph-based framework.")]);
    let compiled = assistance_agent(llm, &db);
    let out = compiled
        .resume(
            Command::resume(json!({"data": "We recommend a graph-based framework."})),
            config.clone(),
        )
        .await
        .unwrap();

    assert!(out.is_done());
    let msgs = messages(&out.state);
    assert_eq!(msgs.len(), 3, "{msgs:?}");
    assert_eq!(
        msgs[1],
        Message::tool(
            "call-1",
            "human_assistance",
            "We recommend a graph-based framework."
        )
    );
    assert_eq!(msgs[2], Message::assistant("Use a graph-based framework."));

    let checkpoint = compiled.get_state(&config).await.unwrap().unwrap();
    assert_eq!(checkpoint.status(), ThreadStatus::Terminated);
    assert!(checkpoint.pending_interrupt.is_none());
}

fn approval_graph() -> agentgraph::CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph.add_fn_node("gate", |state: &State, ctx: &RunContext| {
        if state.get("skip") == Some(&json!(true)) {
            return Ok(StateUpdate::new().set("approved", "skipped"));
        }
        let answer = ctx.interrupt(json!("approve?"))?;
        Ok(StateUpdate::new().set("approved", answer))
    });
    graph.add_edge(START, "gate").add_edge("gate", END);
    graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap()
}

/// **Scenario**: Resume on a thread that never ran, or already finished, is NotSuspended.
#[tokio::test]
async fn resume_requires_pending_interrupt() {
    let compiled = approval_graph();

    let err = compiled
        .resume(Command::resume("yes"), RunnableConfig::thread("fresh"))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NotSuspended(ref t) if t == "fresh"), "{err:?}");

    let config = RunnableConfig::thread("done");
    compiled
        .invoke(StateUpdate::new(), Some(config.clone()))
        .await
        .unwrap();
    let out = compiled
        .resume(Command::resume("yes"), config.clone())
        .await
        .unwrap();
    assert_eq!(out.state.get_str("approved"), Some("yes"));

    let err = compiled
        .resume(Command::resume("again"), config)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NotSuspended(_)));
}

/// **Scenario**: Resume without a checkpointer is rejected.
#[tokio::test]
async fn resume_without_checkpointer_fails() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("gate", |_: &State, ctx: &RunContext| {
        ctx.interrupt(json!("?"))?;
        Ok(StateUpdate::new())
    });
    graph.add_edge(START, "gate").add_edge("gate", END);
    let compiled = graph.compile().unwrap();

    let out = compiled.invoke(StateUpdate::new(), None).await.unwrap();
    assert_eq!(out.pending_node(), Some("gate"));
    let err = compiled
        .resume(Command::resume("x"), RunnableConfig::thread("t"))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NoCheckpointer));
}

/// **Scenario**: A node with two interrupts suspends twice; the second resume replays the
/// first answer to the first interrupt call.
#[tokio::test]
async fn multiple_interrupts_in_one_node() {
    let mut graph = StateGraph::new();
    graph.add_fn_node("form", |_: &State, ctx: &RunContext| {
        let name = ctx.interrupt(json!("name?"))?;
        let color = ctx.interrupt(json!("color?"))?;
        Ok(StateUpdate::new().set("answers", json!([name, color])))
    });
    graph.add_edge(START, "form").add_edge("form", END);
    let compiled = graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap();
    let config = RunnableConfig::thread("form");

    let first = compiled
        .invoke(StateUpdate::new(), Some(config.clone()))
        .await
        .unwrap();
    assert_eq!(first.interrupt(), Some(&json!("name?")));

    let second = compiled
        .resume(Command::resume("ada"), config.clone())
        .await
        .unwrap();
    assert_eq!(second.interrupt(), Some(&json!("color?")));
    let checkpoint = compiled.get_state(&config).await.unwrap().unwrap();
    assert_eq!(checkpoint.resume_values, vec![json!("ada")]);
    assert_eq!(checkpoint.pending_interrupt.as_ref().map(|i| i.index), Some(1));

    let done = compiled
        .resume(Command::resume("green"), config)
        .await
        .unwrap();
    assert!(done.is_done());
    assert_eq!(done.state.get("answers"), Some(&json!(["ada", "green"])));
}

/// **Scenario**: invoke on a suspended thread discards the pending interrupt and starts
/// again from the entry node.
#[tokio::test]
async fn invoke_discards_pending_interrupt() {
    let compiled = approval_graph();
    let config = RunnableConfig::thread("t");

    let out = compiled
        .invoke(StateUpdate::new(), Some(config.clone()))
        .await
        .unwrap();
    assert!(!out.is_done());

    let out = compiled
        .invoke(StateUpdate::new().set("skip", true), Some(config.clone()))
        .await
        .unwrap();
    assert!(out.is_done());
    assert_eq!(out.state.get_str("approved"), Some("skipped"));

    let checkpoint = compiled.get_state(&config).await.unwrap().unwrap();
    assert_eq!(checkpoint.status(), ThreadStatus::Terminated);
    let err = compiled
        .resume(Command::resume("late"), config)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::NotSuspended(_)));
}

/// **Scenario**: Streaming ends with an Interrupt event; stream_resume finishes the run.
#[tokio::test]
async fn stream_reports_interrupt() {
    let compiled = approval_graph();
    let config = RunnableConfig::thread("s");

    let events: Vec<StreamEvent> = compiled
        .stream(
            StateUpdate::new().set("user", "ada"),
            Some(config.clone()),
            [StreamMode::Values, StreamMode::Updates],
        )
        .map(|e| e.unwrap())
        .collect()
        .await;
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Interrupt { node_id, interrupt } => {
            assert_eq!(node_id, "gate");
            assert_eq!(interrupt.value, json!("approve?"));
        }
        other => panic!("expected Interrupt, got {other:?}"),
    }

    let events: Vec<StreamEvent> = compiled
        .stream_resume(Command::resume("ok"), config, [StreamMode::Updates])
        .map(|e| e.unwrap())
        .collect()
        .await;
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Updates { node_id, update } => {
            assert_eq!(node_id, "gate");
            assert_eq!(update.get("approved"), Some(&Value::from("ok")));
        }
        other => panic!("expected Updates, got {other:?}"),
    }
}

/// START → intro → ask → greet → END. `ask` reads its answer from an interrupt, or takes
/// `direct` as if the interrupt call had returned it.
fn ask_graph(direct: Option<Value>) -> agentgraph::CompiledStateGraph {
    let mut graph = StateGraph::new();
    graph.add_channel("log", ChannelPolicy::Append);
    graph.add_fn_node("intro", |_: &State, _: &RunContext| {
        Ok(StateUpdate::new().set("log", "intro"))
    });
    graph.add_fn_node("ask", move |_: &State, ctx: &RunContext| {
        let reply = match &direct {
            Some(value) => value.clone(),
            None => ctx.interrupt(json!({"query": "name?"}))?,
        };
        Ok(StateUpdate::new()
            .set("name", reply["data"].clone())
            .set("log", "ask"))
    });
    graph.add_fn_node("greet", |state: &State, _: &RunContext| {
        let name = state.get_str("name").unwrap_or_default();
        Ok(StateUpdate::new()
            .set("greeting", format!("hello {name}"))
            .set("log", "greet"))
    });
    graph
        .add_edge(START, "intro")
        .add_edge("intro", "ask")
        .add_edge("ask", "greet")
        .add_edge("greet", END);
    graph
        .compile_with_checkpointer(Arc::new(MemorySaver::new()))
        .unwrap()
}

/// **Scenario**: Suspending and resuming with C leaves the same state, next node and step
/// as a run where the interrupt call returned C directly, both right after the
/// interrupting node and at END.
#[tokio::test]
async fn resumed_run_matches_uninterrupted_run() {
    let answer = json!({"data": "ada"});
    let config = RunnableConfig::thread("t");

    let direct = ask_graph(Some(answer.clone()));
    let err = direct
        .invoke(StateUpdate::new(), Some(config.clone().with_recursion_limit(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimit(2)), "{err:?}");
    let direct_mid = direct.get_state(&config).await.unwrap().unwrap();

    let paused = ask_graph(None);
    let out = paused
        .invoke(StateUpdate::new(), Some(config.clone()))
        .await
        .unwrap();
    assert_eq!(out.pending_node(), Some("ask"));
    let err = paused
        .resume(Command::resume(answer), config.clone().with_recursion_limit(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimit(1)), "{err:?}");
    let paused_mid = paused.get_state(&config).await.unwrap().unwrap();

    assert_eq!(paused_mid.state, direct_mid.state);
    assert_eq!(paused_mid.pending_node, "greet");
    assert_eq!(paused_mid.pending_node, direct_mid.pending_node);
    assert_eq!(paused_mid.step(), direct_mid.step());
    assert_eq!(paused_mid.status(), ThreadStatus::Running);

    let direct_end = direct.continue_run(config.clone()).await.unwrap();
    let paused_end = paused.continue_run(config.clone()).await.unwrap();
    assert_eq!(paused_end.state, direct_end.state);
    assert_eq!(paused_end.state.get_str("greeting"), Some("hello ada"));
    let (d, p) = (
        direct.get_state(&config).await.unwrap().unwrap(),
        paused.get_state(&config).await.unwrap().unwrap(),
    );
    assert_eq!(p.pending_node, d.pending_node);
    assert_eq!(p.step(), d.step());
}

//! Chat ⇄ tools loop built by ToolAgentConfig.

use std::sync::Arc;

use agentgraph::{
    user_input, LlmClient, LlmResponse, Message, MockLlm, ToolAgentConfig, ToolCall,
    ToolRegistry,
};
use serde_json::json;

use crate::common::{add_two_numbers_tool, messages};

/// **Scenario**: One tool round: user, tool result "5", final answer; exactly three messages.
#[tokio::test]
async fn add_two_numbers_round_trip() {
    let llm = Arc::new(MockLlm::add_two_numbers_example());
    let tools = ToolRegistry::new().with_tool(add_two_numbers_tool());
    let compiled = ToolAgentConfig::new(llm.clone(), tools).compile().unwrap();

    let out = compiled
        .invoke(user_input("What is 2 + 3?"), None)
        .await
        .unwrap();
    assert!(out.is_done());

    let msgs = messages(&out.state);
    assert_eq!(msgs.len(), 3, "{msgs:?}");
    assert_eq!(msgs[0], Message::user("What is 2 + 3?"));
    assert_eq!(msgs[1], Message::tool("call-1", "add_two_numbers", "5"));
    assert_eq!(msgs[2], Message::assistant("2 + 3 = 5"));
    assert_eq!(llm.call_count(), 2);
}

/// **Scenario**: The model requests tools k times, then answers; the loop runs exactly
/// k tool rounds and k + 1 chat turns.
#[tokio::test]
async fn loop_runs_once_per_tool_request() {
    let k = 3;
    let mut script: Vec<LlmResponse> = (0..k)
        .map(|i| {
            LlmResponse::tool_calls(vec![ToolCall::new(
                format!("call-{i}"),
                "add_two_numbers",
                json!({"a": i, "b": 1}),
            )])
        })
        .collect();
    script.push(LlmResponse::text("done"));
    let llm = Arc::new(MockLlm::new(script));
    let tools = ToolRegistry::new().with_tool(add_two_numbers_tool());
    let compiled = ToolAgentConfig::new(llm.clone(), tools).compile().unwrap();

    let out = compiled.invoke(user_input("count"), None).await.unwrap();
    assert_eq!(llm.call_count(), k + 1);
    assert_eq!(out.steps, 2 * k + 1);

    let msgs = messages(&out.state);
    let tool_results: Vec<&str> = msgs
        .iter()
        .filter(|m| m.role() == "tool")
        .map(|m| m.content())
        .collect();
    assert_eq!(tool_results, vec!["1", "2", "3"]);
    assert_eq!(out.state.get("tool_calls"), Some(&json!([])));
}

/// **Scenario**: An unknown tool becomes an error tool message and the run still finishes.
#[tokio::test]
async fn unknown_tool_is_reported_to_model() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::new(vec![
        LlmResponse::tool_calls(vec![ToolCall::new("c1", "no_such_tool", json!({}))]),
        LlmResponse::text("sorry"),
    ]));
    let tools = ToolRegistry::new().with_tool(add_two_numbers_tool());
    let compiled = ToolAgentConfig::new(llm, tools).compile().unwrap();

    let out = compiled.invoke(user_input("hi"), None).await.unwrap();
    assert!(out.is_done());
    let msgs = messages(&out.state);
    match &msgs[1] {
        Message::Tool {
            name, is_error, ..
        } => {
            assert_eq!(name, "no_such_tool");
            assert!(is_error);
        }
        other => panic!("expected tool message, got {other:?}"),
    }
    assert_eq!(msgs.last(), Some(&Message::assistant("sorry")));
}

/// **Scenario**: Missing required arguments are reported with the default template.
#[tokio::test]
async fn invalid_arguments_use_error_template() {
    let llm = Arc::new(MockLlm::new(vec![
        LlmResponse::tool_calls(vec![ToolCall::new("c1", "add_two_numbers", json!({"a": 1}))]),
        LlmResponse::text("retrying later"),
    ]));
    let tools = ToolRegistry::new().with_tool(add_two_numbers_tool());
    let compiled = ToolAgentConfig::new(llm, tools).compile().unwrap();

    let out = compiled.invoke(user_input("1 + ?"), None).await.unwrap();
    let msgs = messages(&out.state);
    assert!(msgs[1]
        .content()
        .starts_with("Error executing tool 'add_two_numbers'"));
}

/// **Scenario**: Without tools the agent is a single chat turn.
#[tokio::test]
async fn agent_without_tools_answers_once() {
    let llm = Arc::new(MockLlm::with_no_tool_calls("hello"));
    let compiled = ToolAgentConfig::new(llm.clone(), ToolRegistry::new())
        .compile()
        .unwrap();

    let out = compiled.invoke(user_input("hi"), None).await.unwrap();
    assert_eq!(out.steps, 1);
    assert_eq!(messages(&out.state).last(), Some(&Message::assistant("hello")));
    assert_eq!(llm.call_count(), 1);
}

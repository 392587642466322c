//! Conditional routing: a classifier node picks the next node by label.
//!
//! ```bash
//! cargo run -p agentgraph-examples --example routing -- "I am so happy today"
//! ```

use agentgraph::{RunContext, State, StateGraph, StateUpdate, END, START};
use agentgraph_examples::init_tracing;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "routing")]
#[command(about = "Route text to a positive or negative responder")]
struct Args {
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

fn classify(state: &State, _ctx: &RunContext) -> Result<StateUpdate, agentgraph::AgentError> {
    let text = state.get_str("text").unwrap_or_default().to_lowercase();
    let negative = ["sad", "angry", "bad", "hate"];
    let mood = if negative.iter().any(|w| text.contains(w)) {
        "negative"
    } else {
        "positive"
    };
    Ok(StateUpdate::new().set("mood", mood))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let text = if args.rest.is_empty() {
        "what a good day".to_string()
    } else {
        args.rest.join(" ")
    };

    let mut graph = StateGraph::new();
    graph
        .add_fn_node("classify", classify)
        .add_fn_node("cheer", |_: &State, _: &RunContext| {
            Ok(StateUpdate::new().set("reply", "Glad to hear it!"))
        })
        .add_fn_node("comfort", |_: &State, _: &RunContext| {
            Ok(StateUpdate::new().set("reply", "Sorry to hear that. Want to talk about it?"))
        });
    graph.add_edge(START, "classify");
    graph.add_conditional_edges(
        "classify",
        |state: &State| state.get_str("mood").unwrap_or("positive").to_string(),
        [("positive", "cheer"), ("negative", "comfort")],
    );
    graph.add_edge("cheer", END).add_edge("comfort", END);

    let compiled = graph.compile()?;
    let out = compiled
        .invoke(StateUpdate::new().set("text", text), None)
        .await?;
    println!(
        "mood: {}\nreply: {}",
        out.state.get_str("mood").unwrap_or("?"),
        out.state.get_str("reply").unwrap_or("?")
    );
    Ok(())
}

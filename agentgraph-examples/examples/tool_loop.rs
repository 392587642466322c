//! Chat ⇄ tools loop with `add_two_numbers`.
//!
//! ```bash
//! cargo run -p agentgraph-examples --example tool_loop -- "What is 2 + 3?"
//! ```

use std::sync::Arc;

use agentgraph::{user_input, Message, StreamEvent, StreamMode, ToolAgentConfig, ToolRegistry};
use agentgraph_examples::{add_two_numbers_tool, init_tracing, RuleBasedLlm};
use clap::Parser;
use tokio_stream::StreamExt;

#[derive(Parser, Debug)]
#[command(name = "tool_loop")]
#[command(about = "Answer arithmetic questions with a tool call")]
struct Args {
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let question = if args.rest.is_empty() {
        "What is 2 + 3?".to_string()
    } else {
        args.rest.join(" ")
    };

    let tools = ToolRegistry::new().with_tool(add_two_numbers_tool());
    let compiled = ToolAgentConfig::new(Arc::new(RuleBasedLlm), tools).compile()?;

    let mut stream = compiled.stream(user_input(question), None, [StreamMode::Updates]);
    while let Some(event) = stream.next().await {
        if let StreamEvent::Updates { node_id, update } = event? {
            let new_messages: Vec<Message> = update
                .get("messages")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            for m in new_messages {
                println!("{:>5} | [{}] {}", node_id, m.role(), m.content());
            }
        }
    }
    Ok(())
}

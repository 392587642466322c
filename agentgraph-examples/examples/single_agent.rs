//! Single chat node: START → chat → END, one model turn.
//!
//! ```bash
//! cargo run -p agentgraph-examples --example single_agent -- "hello there"
//! ```

use std::sync::Arc;

use agentgraph::{user_input, ToolAgentConfig, ToolRegistry};
use agentgraph_examples::{init_tracing, print_messages, RuleBasedLlm};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "single_agent")]
#[command(about = "One chat turn through a compiled graph")]
struct Args {
    /// User message.
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let input = if args.rest.is_empty() {
        "hello".to_string()
    } else {
        args.rest.join(" ")
    };

    let compiled = ToolAgentConfig::new(Arc::new(RuleBasedLlm), ToolRegistry::new()).compile()?;
    let out = compiled.invoke(user_input(input), None).await?;
    print_messages(&out.state.decode_or_default::<Vec<agentgraph::Message>>("messages")?);
    Ok(())
}

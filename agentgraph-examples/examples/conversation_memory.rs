//! Conversation memory: two turns on one thread share their history; another thread does not.
//!
//! ```bash
//! cargo run -p agentgraph-examples --example conversation_memory
//! ```

use std::sync::Arc;

use agentgraph::{user_input, MemorySaver, Message, RunnableConfig, ToolAgentConfig, ToolRegistry};
use agentgraph_examples::{init_tracing, print_messages, RuleBasedLlm};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let compiled = ToolAgentConfig::new(Arc::new(RuleBasedLlm), ToolRegistry::new())
        .with_checkpointer(Arc::new(MemorySaver::new()))
        .compile()?;

    let thread = RunnableConfig::thread("1");
    compiled
        .invoke(user_input("Hi there! My name is Will."), Some(thread.clone()))
        .await?;
    let out = compiled
        .invoke(user_input("Remember my name?"), Some(thread.clone()))
        .await?;
    println!("--- thread 1");
    print_messages(&out.state.decode_or_default::<Vec<Message>>("messages")?);

    let out = compiled
        .invoke(user_input("Remember my name?"), Some(RunnableConfig::thread("2")))
        .await?;
    println!("--- thread 2");
    print_messages(&out.state.decode_or_default::<Vec<Message>>("messages")?);

    if let Some(checkpoint) = compiled.get_state(&thread).await? {
        println!(
            "--- thread 1 checkpoint: step {} status {:?}",
            checkpoint.step(),
            checkpoint.status()
        );
    }
    Ok(())
}

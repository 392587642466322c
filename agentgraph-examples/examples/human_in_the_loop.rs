//! Human in the loop with a persistent thread: `run` suspends on `human_assistance`,
//! `resume` answers it (possibly from a new process), `show` prints the latest checkpoint.
//!
//! ```bash
//! cargo run -p agentgraph-examples --example human_in_the_loop -- run "I need some expert guidance"
//! cargo run -p agentgraph-examples --example human_in_the_loop -- resume "Use a graph framework."
//! cargo run -p agentgraph-examples --example human_in_the_loop -- show
//! ```
//!
//! `AGENTGRAPH_DB_PATH` and `AGENTGRAPH_THREAD_ID` select the database and thread.

use std::sync::Arc;

use agentgraph::{
    user_input, Command, CompiledStateGraph, Message, RunResult, RunStatus, RunnableConfig,
    SqliteSaver, ToolAgentConfig, ToolRegistry,
};
use agentgraph_examples::{
    add_two_numbers_tool, human_assistance_tool, init_tracing, print_messages, DemoConfig,
    RuleBasedLlm,
};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "human_in_the_loop")]
#[command(about = "Suspend on a human request and resume it later")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Start a turn with a user message.
    Run {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Answer the pending human_assistance request.
    Resume {
        #[arg(trailing_var_arg = true)]
        answer: Vec<String>,
    },
    /// Print the thread's latest checkpoint.
    Show,
}

fn report(out: &RunResult) -> Result<(), Box<dyn std::error::Error>> {
    print_messages(&out.state.decode_or_default::<Vec<Message>>("messages")?);
    match &out.status {
        RunStatus::Done => println!("--- done after {} step(s)", out.steps),
        RunStatus::Interrupted { node, interrupt } => {
            println!("--- suspended at '{}': {}", node, interrupt.value);
            println!("answer with: human_in_the_loop resume <text>");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let config = DemoConfig::from_env();
    let args = Args::parse();

    tracing::info!(
        db = %config.db_path.display(),
        thread = %config.thread_id,
        "Opening checkpoint store"
    );
    let saver = SqliteSaver::open(&config.db_path)?;
    let tools = ToolRegistry::new()
        .with_tool(human_assistance_tool())
        .with_tool(add_two_numbers_tool());
    let compiled: CompiledStateGraph = ToolAgentConfig::new(Arc::new(RuleBasedLlm), tools)
        .with_checkpointer(Arc::new(saver))
        .compile()?;
    let thread = RunnableConfig::thread(config.thread_id.clone());

    match args.command {
        Cmd::Run { message } => {
            let text = if message.is_empty() {
                "I need some expert guidance for building an AI agent.".to_string()
            } else {
                message.join(" ")
            };
            let out = compiled.invoke(user_input(text), Some(thread)).await?;
            report(&out)?;
        }
        Cmd::Resume { answer } => {
            let data = if answer.is_empty() {
                "We, the experts, recommend a graph-based agent framework.".to_string()
            } else {
                answer.join(" ")
            };
            let out = compiled
                .resume(Command::resume(json!({ "data": data })), thread)
                .await?;
            report(&out)?;
        }
        Cmd::Show => match compiled.get_state(&thread).await? {
            Some(checkpoint) => {
                println!(
                    "thread {} | step {} | status {:?} | next {}",
                    config.thread_id,
                    checkpoint.step(),
                    checkpoint.status(),
                    checkpoint.pending_node
                );
                if let Some(interrupt) = &checkpoint.pending_interrupt {
                    println!("pending interrupt: {}", interrupt.value);
                }
                print_messages(&checkpoint.state.decode_or_default::<Vec<Message>>("messages")?);
            }
            None => println!("thread {} has no checkpoint", config.thread_id),
        },
    }
    Ok(())
}

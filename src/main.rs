// src/main.rs
// Demo CLI for the scribe gateway: one-shot completions and a line-based
// chat over the conversation relay.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use scribe::chat::ChatTurn;
use scribe::{CompletionRequest, CompletionResult, ConversationRelay, Gateway, GatewayConfig, LocalStore};

#[derive(Parser)]
#[command(name = "scribe", about = "LLM provider gateway for the Scribe code editor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one completion and print the result
    Ask {
        prompt: String,
        /// Path to a JSON schema describing the expected response shape
        #[arg(long)]
        json_shape: Option<PathBuf>,
    },
    /// Interactive chat over the conversation relay
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = GatewayConfig::from_env();

    if config.any_credential() {
        info!("active provider: {}", config.active.as_str());
    } else {
        info!("no provider configured, using offline simulator");
    }

    let gateway = Arc::new(Gateway::new(config));

    match cli.command {
        Command::Ask { prompt, json_shape } => {
            let mut request = CompletionRequest::text(prompt);
            if let Some(path) = json_shape {
                let shape = serde_json::from_str(&std::fs::read_to_string(path)?)?;
                request = request.with_shape(shape);
            }

            match gateway.complete(&request).await? {
                CompletionResult::Text(text) => println!("{}", text),
                CompletionResult::Structured(value) => {
                    println!("{}", serde_json::to_string_pretty(&value)?)
                }
            }
        }
        Command::Chat => {
            let store = LocalStore::open(&gateway.config().data_dir)?;
            let relay = ConversationRelay::new(store, gateway.clone());
            let conversation = relay.create_conversation("coding-assistant", serde_json::json!({}))?;

            let subscription = relay.subscribe(&conversation.id, |conv| {
                if let Some(turn) = conv.messages.last() {
                    if turn.role == scribe::Role::Assistant {
                        println!("assistant> {}", turn.content);
                    }
                }
            });

            println!("assistant> {}", conversation.messages[0].content);
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                relay.add_message(&conversation.id, ChatTurn::user(line))?;
                // Give the deferred reply time to land before prompting again.
                tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
            }

            subscription.unsubscribe();
        }
    }

    Ok(())
}

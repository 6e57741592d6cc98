use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use codehelper::config::Config;
use codehelper::host::ConsoleHost;
use codehelper::llm::OpenAiClient;
use codehelper::storage::{FileStore, MemoryStore, StateStore};
use codehelper::{InboundEvent, SessionManager};

#[derive(Parser)]
#[command(name = "codehelper")]
#[command(version)]
#[command(about = "Code helper chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot in this terminal (default)
    Chat {
        /// Conversation to join; history is kept per conversation
        #[arg(short, long, default_value = "console")]
        conversation: String,

        /// Keep conversation state in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// List stored conversations
    List,
}

fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn chat(config: &Config, conversation_id: String, ephemeral: bool) -> Result<()> {
    let completion = OpenAiClient::from_config(config)?;
    tracing::info!("API key loaded, completion client ready");

    let store: Arc<dyn StateStore> = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileStore::new(config.conversations_dir()))
    };
    let session = SessionManager::new(Arc::new(completion), store, Arc::new(ConsoleHost::new()));

    session
        .handle_event(InboundEvent::member_added(&conversation_id))
        .await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        session
            .handle_event(InboundEvent::message(&conversation_id, line))
            .await;
    }

    tracing::info!("input closed, exiting");
    Ok(())
}

async fn list_conversations(config: &Config) -> Result<()> {
    let store = FileStore::new(config.conversations_dir());
    let conversations = store.list().await?;

    if conversations.is_empty() {
        println!("📭 No conversations yet. Run 'codehelper' to start one!");
        return Ok(());
    }

    println!("💬 Stored conversations:\n");
    for summary in conversations {
        println!("  • {}", summary.conversation_id);
        println!("    🕒 Updated: {}", summary.updated_at.to_rfc3339());
        println!(
            "    📝 {} stored turns, {} messages processed",
            summary.turns, summary.message_count
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_tracing(&config);

    match cli.command {
        None => chat(&config, "console".to_string(), false).await,
        Some(Commands::Chat { conversation, ephemeral }) => {
            chat(&config, conversation, ephemeral).await
        }
        Some(Commands::List) => list_conversations(&config).await,
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};

use triago::config::Config;
use triago::{ChatManager, HttpChatApi, NoticeLevel};

#[derive(Parser)]
#[command(name = "triago")]
#[command(version)]
#[command(about = "Terminal chat client for the triage assistant service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all conversations
    List,
    /// Create a new conversation and print its id
    New,
    /// Send a message to a conversation and print the reply
    Send { chat_id: String, message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let mut manager = ChatManager::new(HttpChatApi::new(config.api_base_url.clone()));

    match cli.command {
        None => {
            triago::ui::run(manager, config).await?;
        }
        Some(Commands::List) => {
            manager.refresh().await;
            drain_notices(&mut manager);
            if manager.store().conversations().is_empty() {
                println!("No conversations yet. Run 'triago new' to start one.");
            } else {
                for conv in manager.store().conversations() {
                    let marker = if conv.is_emergency() { " [EMERGENCY]" } else { "" };
                    println!(
                        "{}  {} ({} messages){}",
                        conv.id,
                        conv.display_title(),
                        conv.messages.len(),
                        marker
                    );
                }
            }
        }
        Some(Commands::New) => {
            if let Some(id) = manager.create_conversation().await? {
                println!("{}", id);
            }
            drain_notices(&mut manager);
        }
        Some(Commands::Send { chat_id, message }) => {
            manager.select(chat_id.clone());
            manager.send_message(&message, &chat_id).await?;
            drain_notices(&mut manager);
            if let Some(conv) = manager.current() {
                if let Some(last) = conv.messages.last() {
                    println!("{}: {}", last.sender.display_name(), last.content);
                }
            }
        }
    }

    Ok(())
}

fn drain_notices(manager: &mut ChatManager<HttpChatApi>) {
    while let Some(notice) = manager.take_notice() {
        match notice.level {
            NoticeLevel::Info => println!("{}: {}", notice.title, notice.detail),
            NoticeLevel::Error => eprintln!("{}: {}", notice.title, notice.detail),
        }
    }
}

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use persona_chat_core::{logging, ChatError, Config, HttpChatClient, Personality, DEFAULT_API_URL};

mod app;
mod handler;
mod tui;
mod ui;
mod viewport;

use app::App;

#[derive(Parser)]
#[command(name = "persona-chat", version)]
#[command(about = "Chat with a personality-aware bot from your terminal")]
struct Cli {
    /// Personality to start with (polite, friendly, energetic, mirror, sarcastic, professional)
    #[arg(short, long)]
    personality: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_path) = logging::log_file_path() {
        logging::init_tracing(&log_path);
    }

    let personality = match cli.personality {
        Some(value) => Personality::from_value(&value)
            .ok_or(ChatError::UnknownPersonality(value))?,
        None => load_config().resolve_personality(),
    };

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, personality).await;

    tui::restore()?;
    result
}

fn load_config() -> Config {
    Config::load()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            Config::new()
        })
        .with_env_overrides()
}

async fn run(terminal: &mut tui::Tui, personality: Personality) -> Result<()> {
    let mut events = tui::EventHandler::new();
    let size = terminal.size()?;

    let client = HttpChatClient::new(DEFAULT_API_URL);
    tracing::info!(
        personality = personality.value(),
        endpoint = client.url(),
        "chat session started"
    );
    let mut app = App::new(Arc::new(client), personality, events.sender(), (size.width, size.height));

    while !app.should_quit {
        if app.viewport.take_repaint() {
            terminal.clear()?;
        }
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
    }

    tracing::info!(messages = app.session.conversation().len(), "chat session ended");
    Ok(())
}

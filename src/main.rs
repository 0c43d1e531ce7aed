//! Ephemeral Chat - terminal chat room with an AI assistant
//!
//! Rooms live only in memory. Messages starting with `@ai ` are answered by
//! Google Gemini.

mod assistant;
mod config;
mod models;
mod room;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{mask_key, Config};

#[derive(Parser)]
#[command(name = "ephemeral-chat")]
#[command(about = "Ephemeral terminal chat room with an AI assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key (overrides $API_KEY, $GEMINI_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface (default)
    Tui {
        /// Pre-fill the username field
        #[arg(short, long)]
        username: Option<String>,

        /// Pre-fill the room code field
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Ask the assistant a single question and print the answer
    Ask {
        /// Question text
        prompt: String,
    },

    /// Save an API key to the config file
    SetKey {
        /// Gemini API key
        key: String,
    },

    /// Remove the saved API key
    ClearKey,

    /// Show configuration and API key status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        username: None,
        room: None,
    });

    // Initialize logging. The TUI owns the terminal, so its logs go to the
    // in-memory buffer shown in the debug pane.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        || tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let log_buffer = tui::LogBuffer::new();
    if matches!(command, Commands::Tui { .. }) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_buffer.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    match command {
        Commands::Tui { username, room } => {
            let config = Config::load()?;
            let api_key = config.resolve_api_key(cli.api_key);
            match api_key {
                Some(ref k) => tracing::info!("Using API key from {}", k.source),
                None => tracing::warn!("No API key found"),
            }
            let options = tui::TuiOptions {
                username,
                room,
                api_key,
                config,
            };
            tui::run(options, log_buffer).await?;
        }
        Commands::Ask { prompt } => {
            let config = Config::load()?;
            let api_key = config.resolve_api_key(cli.api_key).map(|k| k.key);
            let reply =
                assistant::ask(api_key, &config.assistant_settings(), prompt.trim()).await;
            println!("{}", reply.text);
        }
        Commands::SetKey { key } => {
            let key = key.trim().to_string();
            if key.is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            let mut config = Config::load()?;
            config.set_api_key(key);
            config.save()?;
            println!("API key saved to {}", Config::config_path()?.display());
        }
        Commands::ClearKey => {
            let mut config = Config::load()?;
            config.clear_api_key();
            config.save()?;
            println!("Saved API key removed.");
        }
        Commands::Status => {
            let config = Config::load()?;
            let settings = config.assistant_settings();
            println!("Config:   {}", Config::config_path()?.display());
            println!("Model:    {}", settings.model);
            println!("Endpoint: {}", settings.base_url);
            match config.resolve_api_key(cli.api_key) {
                Some(k) => println!("API key:  {} ({})", mask_key(&k.key), k.source),
                None => println!("API key:  not configured"),
            }
        }
    }

    Ok(())
}

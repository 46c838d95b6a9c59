//! Planassist - streaming planning assistant
//!
//! CLI entry point for the interactive chat surface.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use planassist::cli::{Cli, Command};
use planassist::config::Config;
use planassist::llm::MoonshotClient;
use planassist::repl::ChatRepl;
use planstore::{JsonFileStore, TaskStore};

/// Log to a file so stdout stays clean for the chat stream
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planassist")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("planassist.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Config { show }) => {
            if show {
                print!("{}", serde_yaml::to_string(&config)?);
            } else {
                println!("Use --show to print the effective configuration");
            }
            Ok(())
        }
        Some(Command::Chat) | None => cmd_chat(&config).await,
    }
}

async fn cmd_chat(config: &Config) -> Result<()> {
    // Fail fast on a missing credential, before touching the network
    config.validate()?;
    let llm = MoonshotClient::from_config(&config.llm).context("Failed to create chat client")?;

    let store = JsonFileStore::open(&config.storage.tasks_file).context(format!(
        "Failed to open task store at {}",
        config.storage.tasks_file.display()
    ))?;
    info!(tasks = store.list().len(), "Task store opened");

    ChatRepl::new(Arc::new(llm), store).run().await
}

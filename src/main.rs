//! Humanloop CLI entry point.

use anyhow::Result;
use clap::Parser;
use humanloop::cli::{commands, Cli, Commands};
use humanloop::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = match &cli.config {
        Some(_) => Settings::load_from(Some(&config_path))?,
        None => Settings::load()?,
    };

    // Initialize logging. stdout carries JSON-RPC, so logs go to stderr.
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("humanloop={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command.unwrap_or(Commands::Mcp) {
        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Path => {
            commands::run_path(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &config_path, &settings)?;
        }
    }

    Ok(())
}

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use aqi_core::AqiClient;
use aqi_dashboard::cli::{Cli, Commands};
use aqi_dashboard::commands::{cmd_config, cmd_health, cmd_history, cmd_latest, cmd_predict};
use aqi_dashboard::config::{Config, default_log_path, resolve_api_url};
use aqi_dashboard::tui;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // The dashboard owns the terminal, so its logs go to a file
    if cli.is_tui() {
        let path = cli.log_file.clone().unwrap_or_else(default_log_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = Config::load();
    let api_url = resolve_api_url(cli.api_url.as_deref(), &config);
    let no_color = cli.no_color;

    match cli.subcommand() {
        Commands::Tui => tui::run(&config, api_url).await?,
        Commands::Latest { format } => {
            let client = AqiClient::new(&api_url)?;
            cmd_latest(&client, *format, no_color).await?;
        }
        Commands::History { limit, format } => {
            let client = AqiClient::new(&api_url)?;
            cmd_history(&client, *limit, *format, no_color).await?;
        }
        Commands::Predict { aqi, format } => {
            let client = AqiClient::new(&api_url)?;
            cmd_predict(&client, *aqi, *format, no_color).await?;
        }
        Commands::Health { format } => {
            let client = AqiClient::new(&api_url)?;
            cmd_health(&client, *format, no_color).await?;
        }
        Commands::Config { action } => cmd_config(action, &config)?,
    }

    Ok(())
}

//! One-shot command implementations.

use anyhow::{Context, Result, bail};
use aqi_core::AqiSource;
use tracing::info;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;
use crate::format::{
    format_health_text, format_history_text, format_json, format_reading_text,
};
use crate::util::local_offset;

/// Print the latest reading.
pub async fn cmd_latest<S: AqiSource + ?Sized>(
    source: &S,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    let latest = source
        .fetch_latest()
        .await
        .with_context(|| format!("Failed to fetch latest reading from {}", source.endpoint()))?;

    match (latest, format) {
        (Some(reading), OutputFormat::Json) => println!("{}", format_json(&reading)?),
        (Some(reading), OutputFormat::Text) => {
            print!("{}", format_reading_text(&reading, local_offset(), no_color))
        }
        (None, OutputFormat::Json) => println!("null"),
        (None, OutputFormat::Text) => println!("Waiting for data..."),
    }
    Ok(())
}

/// Print recent history, most recent first.
pub async fn cmd_history<S: AqiSource + ?Sized>(
    source: &S,
    limit: usize,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    if limit == 0 {
        bail!("--limit must be greater than zero");
    }
    let history = source
        .fetch_history(limit)
        .await
        .with_context(|| format!("Failed to fetch history from {}", source.endpoint()))?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&history)?),
        OutputFormat::Text => print!("{}", format_history_text(&history, local_offset(), no_color)),
    }
    Ok(())
}

/// Submit a manual prediction and print the result.
pub async fn cmd_predict<S: AqiSource + ?Sized>(
    source: &S,
    aqi: f64,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    info!(aqi, "Submitting manual prediction");
    let reading = source
        .submit_manual_prediction(aqi)
        .await
        .context("Prediction request failed")?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&reading)?),
        OutputFormat::Text => print!("{}", format_reading_text(&reading, local_offset(), no_color)),
    }
    Ok(())
}

/// Print backend health.
pub async fn cmd_health<S: AqiSource + ?Sized>(
    source: &S,
    format: OutputFormat,
    no_color: bool,
) -> Result<()> {
    let health = source
        .health()
        .await
        .with_context(|| format!("Health check against {} failed", source.endpoint()))?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&health)?),
        OutputFormat::Text => print!("{}", format_health_text(&health, no_color)),
    }
    Ok(())
}

/// Manage the configuration file.
pub fn cmd_config(action: &ConfigAction, config: &Config) -> Result<()> {
    let path = Config::path();
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save_to(&path)?;
            info!(path = %path.display(), "Wrote default config");
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_core::{MockSource, Reading};

    #[tokio::test]
    async fn test_latest_with_and_without_data() {
        let source = MockSource::new();
        cmd_latest(&source, OutputFormat::Text, true).await.unwrap();

        source.set_latest(Some(Reading::new(55.0))).await;
        cmd_latest(&source, OutputFormat::Json, true).await.unwrap();
        assert_eq!(source.latest_calls(), 2);
    }

    #[tokio::test]
    async fn test_latest_error_has_context() {
        let source = MockSource::new();
        source.set_fail_latest(true);
        let err = cmd_latest(&source, OutputFormat::Text, true).await.unwrap_err();
        assert!(err.to_string().contains("mock://backend"));
    }

    #[tokio::test]
    async fn test_history_zero_limit() {
        let source = MockSource::new();
        assert!(cmd_history(&source, 0, OutputFormat::Text, true).await.is_err());
        assert_eq!(source.history_calls(), 0);
    }

    #[tokio::test]
    async fn test_predict() {
        let source = MockSource::new();
        cmd_predict(&source, 88.0, OutputFormat::Text, true).await.unwrap();
        assert_eq!(source.predictions(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let source = MockSource::new();
        cmd_health(&source, OutputFormat::Json, true).await.unwrap();
    }
}

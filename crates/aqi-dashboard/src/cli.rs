//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "aqi-dashboard")]
#[command(author, version, about = "Terminal dashboard for an AQI prediction backend", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base URL of the prediction backend
    #[arg(long, global = true, env = "AQI_API_URL")]
    pub api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log file used while the dashboard is running
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; the dashboard when none is given.
    pub fn subcommand(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Tui)
    }

    /// Whether logs should go to a file instead of stderr.
    pub fn is_tui(&self) -> bool {
        matches!(self.subcommand(), Commands::Tui)
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Tui,

    /// Print the latest reading
    Latest {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print recent prediction history
    History {
        /// Number of entries to retrieve
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Ask the backend to classify an AQI value
    Predict {
        /// AQI value to classify
        aqi: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check backend health
    Health {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["aqi-dashboard"]).unwrap();
        assert_eq!(cli.subcommand(), &Commands::Tui);
        assert!(cli.is_tui());
    }

    #[test]
    fn test_history_args() {
        let cli =
            Cli::try_parse_from(["aqi-dashboard", "history", "--limit", "5", "-f", "json"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            &Commands::History {
                limit: 5,
                format: OutputFormat::Json
            }
        );
        assert!(!cli.is_tui());
    }

    #[test]
    fn test_predict_value() {
        let cli = Cli::try_parse_from(["aqi-dashboard", "predict", "142.5"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            &Commands::Predict {
                aqi: 142.5,
                format: OutputFormat::Text
            }
        );
    }

    #[test]
    fn test_global_api_url() {
        let cli =
            Cli::try_parse_from(["aqi-dashboard", "latest", "--api-url", "http://pi:5000"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://pi:5000"));
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::try_parse_from(["aqi-dashboard", "config", "init", "--force"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            &Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        );
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["aqi-dashboard", "latest", "-f", "csv"]).is_err());
    }
}

//! Terminal dashboard and command-line client for an AQI prediction backend.
//!
//! The backend ingests sensor readings, classifies each AQI value into a
//! health category, and serves the results over HTTP. This crate polls it and
//! renders the latest reading, the recent history and the raw sensor feed in
//! a terminal UI, and offers one-shot commands for scripting.
//!
//! # Features
//!
//! - **Live dashboard**: Latest AQI, predicted category and class probabilities
//! - **History charts**: AQI trend plus distributions by status and by AQI range
//! - **Raw sensor view**: Sparkline of the unprocessed sensor samples
//! - **Manual predictions**: Classify an arbitrary AQI value
//! - **Accent color picker**: Pick a palette color or spin the randomizer
//! - **Multiple output formats**: Text and JSON output for one-shot commands
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tui` | Open the interactive dashboard (default) |
//! | `latest` | Print the latest reading |
//! | `history` | Print recent prediction history |
//! | `predict` | Classify an AQI value |
//! | `health` | Check backend health |
//! | `config` | Manage the configuration file |
//!
//! # Configuration
//!
//! Settings are read from `~/.config/aqi-dashboard/config.toml` (or platform
//! equivalent):
//!
//! - `api_url`: Backend base URL
//! - `poll_interval_ms`: Time between poll cycles
//! - `history_limit`: History entries requested per cycle
//! - `raw_history` / `raw_history_limit`: Poll the raw sensor feed
//! - `sound`: Ring the terminal bell around a color spin
//! - `default_color`: Accent color at startup
//!
//! # Environment Variables
//!
//! - `AQI_API_URL`: Backend base URL (overridden by `--api-url`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter, as understood by `tracing-subscriber`
//!
//! # Examples
//!
//! Open the dashboard against a remote backend:
//! ```bash
//! aqi-dashboard --api-url http://192.168.1.20:5000
//! ```
//!
//! Print the last 50 predictions as JSON:
//! ```bash
//! aqi-dashboard history --limit 50 --format json
//! ```
//!
//! Classify a value:
//! ```bash
//! aqi-dashboard predict 135
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod tui;
pub mod util;

//! Client-side pipeline for the AQI prediction dashboard.
//!
//! This crate talks to the prediction backend over HTTP, polls it on a
//! fixed cadence, and turns what it returns into the values the dashboard
//! renders. It has no terminal dependencies; the `aqi-dashboard` binary
//! owns all drawing and input.
//!
//! # Features
//!
//! - **Data client**: [`AqiClient`] for the latest reading, prediction
//!   history, raw sensor history, manual predictions and health
//! - **Polling**: [`Poller`] publishes [`MonitorEvent`]s on a fixed interval
//!   with cancellation
//! - **Color randomizer**: [`ColorPicker`], a deadline-driven state machine
//!   with an [`AudioCue`] hook
//! - **Chart data**: [`HistorySummary`] with the chronological series and
//!   the two distributions
//! - **Testing**: [`MockSource`] implements [`AqiSource`] without a network
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use aqi_core::{AqiClient, MonitorEvent, PollConfig, Poller};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AqiClient::new("http://localhost:5000")?);
//!     let (tx, mut rx) = mpsc::channel(32);
//!     let _handle = Poller::new(client, PollConfig::default(), tx).spawn();
//!
//!     while let Some(event) = rx.recv().await {
//!         if let MonitorEvent::LatestReading(reading) = event {
//!             println!("AQI {} ({})", reading.rounded_aqi(), reading.category());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod messages;
pub mod mock;
pub mod poll;
pub mod randomizer;
pub mod series;
pub mod traits;

pub use client::{
    AqiClient, ClientError, DEFAULT_BASE_URL, HealthResponse, Result, normalize_base_url,
};
pub use messages::{Command, MonitorEvent};
pub use mock::MockSource;
pub use poll::{PollConfig, Poller, PollerHandle};
pub use randomizer::{AudioCue, AudioError, ColorPicker, PickerError, Silent};
pub use series::{Distribution, HistorySummary, SeriesPoint, Slice};
pub use traits::AqiSource;

// Re-export the shared types so downstream crates need one import path
pub use aqi_types::{
    ConnectionState, FALLBACK_GRAY, HistoryEntry, PaletteColor, RawReading, Reading, ReadingTime,
    Rgb, SeverityBucket, category_of, status_color, status_label,
};

//! Message types for UI/worker communication.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI loop       | --------------> |  worker/poller   |
//! |    (ratatui)     |                 |  (tokio tasks)   |
//! |                  | <-------------- |                  |
//! +------------------+  MonitorEvent   +------------------+
//! ```
//!
//! - [`Command`]: requests sent from the UI to the background worker
//! - [`MonitorEvent`]: results sent from the worker and poller back to the UI

use aqi_types::{HistoryEntry, RawReading, Reading};

use crate::client::HealthResponse;

/// Commands sent from the UI to the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ask the backend to classify a manually entered AQI value.
    Predict {
        /// The AQI value to classify.
        aqi: f64,
    },

    /// Query the backend health endpoint.
    CheckHealth,

    /// Fetch the raw sensor history once, outside the poll cadence.
    RefreshRawHistory,

    /// Shut down the worker.
    Shutdown,
}

/// Events sent from the background tasks to the UI.
///
/// Latest and history events from the same poll cycle may arrive in either
/// order; each is applied on its own.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// The latest fetch returned a reading.
    LatestReading(Reading),

    /// The backend answered but has no reading yet.
    NoReadingYet,

    /// The latest fetch failed.
    LatestFailed {
        /// Description of the error.
        error: String,
    },

    /// A fresh history list, most recent first.
    HistoryUpdated(Vec<HistoryEntry>),

    /// A fresh raw sensor history list.
    RawHistoryUpdated(Vec<RawReading>),

    /// A raw history fetch requested by the user failed.
    RawHistoryFailed {
        /// Description of the error.
        error: String,
    },

    /// A manual prediction finished.
    PredictionComplete(Reading),

    /// A manual prediction failed.
    PredictionFailed {
        /// Description of the error.
        error: String,
    },

    /// Health check result.
    HealthChecked(HealthResponse),

    /// Health check failed.
    HealthFailed {
        /// Description of the error.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_debug() {
        let cmd = Command::Predict { aqi: 120.5 };
        let debug = format!("{:?}", cmd);
        assert!(debug.contains("Predict"));
        assert!(debug.contains("120.5"));
    }

    #[test]
    fn test_event_clone() {
        let event = MonitorEvent::LatestFailed {
            error: "refused".to_string(),
        };
        match event.clone() {
            MonitorEvent::LatestFailed { error } => assert_eq!(error, "refused"),
            _ => panic!("Expected LatestFailed variant"),
        }
    }
}

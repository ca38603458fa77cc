//! Shared types for the AQI prediction dashboard.
//!
//! This crate holds the data model exchanged with the prediction backend
//! and the pure mapping rules applied to it, so that both the core client
//! (aqi-core) and the terminal dashboard (aqi-dashboard) agree on them.
//!
//! # Features
//!
//! - [`Reading`], [`RawReading`] and [`ReadingTime`] as received from the backend
//! - [`SeverityBucket`] categorization of AQI values with fixed colors
//! - The 10-entry accent [`PaletteColor`] palette
//! - [`ConnectionState`] of the polling loop
//!
//! # Example
//!
//! ```
//! use aqi_types::{status_color, Reading, SeverityBucket};
//!
//! let reading = Reading::new(123.0).with_status("Unhealthy_for_Sensitive");
//! assert_eq!(reading.category(), SeverityBucket::UnhealthyForSensitive);
//! assert_eq!(status_color(reading.status_name()).to_string(), "#FF7E00");
//! ```

pub mod category;
pub mod color;
pub mod error;
pub mod reading;

pub use category::{SeverityBucket, status_label};
pub use color::{FALLBACK_GRAY, PALETTE_SIZE, PaletteColor, Rgb};
pub use error::{ParseError, ParseResult};
pub use reading::{
    ConnectionState, DEFAULT_PREDICTION_INTERVAL_MINUTES, HistoryEntry, RawReading, Reading,
    ReadingTime, round_half_up,
};

/// Categorize an AQI value.
///
/// Total over all inputs: values at a bucket's upper bound belong to that
/// bucket, negatives and NaN map to [`SeverityBucket::Good`].
#[must_use]
pub fn category_of(aqi: f64) -> SeverityBucket {
    SeverityBucket::from_aqi(aqi)
}

/// Display color for a backend status name.
///
/// Unknown names get [`FALLBACK_GRAY`].
#[must_use]
pub fn status_color(status: &str) -> Rgb {
    SeverityBucket::from_status(status)
        .map(SeverityBucket::color)
        .unwrap_or(FALLBACK_GRAY)
}

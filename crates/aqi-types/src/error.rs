//! Error types for parsing values received from the prediction backend.

use thiserror::Error;

/// Errors that can occur when parsing AQI dashboard values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A color string was not a `#RRGGBB` or `#RGB` hex value.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A timestamp was neither RFC 3339 nor a naive ISO-8601 date-time.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A status name did not match any severity bucket.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

/// Result type alias using aqi-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

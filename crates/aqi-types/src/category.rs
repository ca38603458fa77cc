//! AQI severity buckets.
//!
//! The six buckets follow the EPA AQI table. Each bucket has an inclusive
//! upper bound; a value exactly at a boundary belongs to the lower-severity
//! bucket.
//!
//! | Bucket                    | AQI range | Color     |
//! |---------------------------|-----------|-----------|
//! | `Good`                    | 0-50      | `#00E400` |
//! | `Moderate`                | 51-100    | `#FFFF00` |
//! | `Unhealthy_for_Sensitive` | 101-150   | `#FF7E00` |
//! | `Unhealthy`               | 151-200   | `#FF0000` |
//! | `Very_Unhealthy`          | 201-300   | `#8F3F97` |
//! | `Hazardous`               | 300+      | `#7E0023` |

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ParseError;

/// Severity category for an AQI value.
///
/// Ordered from least to most severe, so comparisons follow severity.
///
/// ```
/// use aqi_types::SeverityBucket;
///
/// assert_eq!(SeverityBucket::from_aqi(50.0), SeverityBucket::Good);
/// assert_eq!(SeverityBucket::from_aqi(51.0), SeverityBucket::Moderate);
/// assert!(SeverityBucket::Hazardous > SeverityBucket::Unhealthy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeverityBucket {
    Good,
    Moderate,
    #[cfg_attr(feature = "serde", serde(rename = "Unhealthy_for_Sensitive"))]
    UnhealthyForSensitive,
    Unhealthy,
    #[cfg_attr(feature = "serde", serde(rename = "Very_Unhealthy"))]
    VeryUnhealthy,
    Hazardous,
}

impl SeverityBucket {
    /// All buckets in ascending severity.
    pub const ALL: [SeverityBucket; 6] = [
        SeverityBucket::Good,
        SeverityBucket::Moderate,
        SeverityBucket::UnhealthyForSensitive,
        SeverityBucket::Unhealthy,
        SeverityBucket::VeryUnhealthy,
        SeverityBucket::Hazardous,
    ];

    /// Categorize an AQI value.
    ///
    /// Bounds are checked top-down and the first satisfied `<=` wins.
    /// Negative values fall into `Good`; NaN is treated as `Good` as well so
    /// the function stays total.
    #[must_use]
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi.is_nan() {
            return SeverityBucket::Good;
        }
        Self::ALL
            .into_iter()
            .find(|bucket| aqi <= bucket.upper_bound())
            .unwrap_or(SeverityBucket::Hazardous)
    }

    /// Inclusive upper AQI bound (`f64::INFINITY` for `Hazardous`).
    #[must_use]
    pub fn upper_bound(self) -> f64 {
        match self {
            SeverityBucket::Good => 50.0,
            SeverityBucket::Moderate => 100.0,
            SeverityBucket::UnhealthyForSensitive => 150.0,
            SeverityBucket::Unhealthy => 200.0,
            SeverityBucket::VeryUnhealthy => 300.0,
            SeverityBucket::Hazardous => f64::INFINITY,
        }
    }

    /// Status name as used by the prediction backend.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            SeverityBucket::Good => "Good",
            SeverityBucket::Moderate => "Moderate",
            SeverityBucket::UnhealthyForSensitive => "Unhealthy_for_Sensitive",
            SeverityBucket::Unhealthy => "Unhealthy",
            SeverityBucket::VeryUnhealthy => "Very_Unhealthy",
            SeverityBucket::Hazardous => "Hazardous",
        }
    }

    /// Parse a backend status name.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.wire_name() == status)
    }

    /// Display label (underscores rendered as spaces).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SeverityBucket::Good => "Good",
            SeverityBucket::Moderate => "Moderate",
            SeverityBucket::UnhealthyForSensitive => "Unhealthy for Sensitive",
            SeverityBucket::Unhealthy => "Unhealthy",
            SeverityBucket::VeryUnhealthy => "Very Unhealthy",
            SeverityBucket::Hazardous => "Hazardous",
        }
    }

    /// Label used by the AQI-range distribution.
    #[must_use]
    pub fn range_label(self) -> &'static str {
        match self {
            SeverityBucket::Good => "Good (0-50)",
            SeverityBucket::Moderate => "Moderate (51-100)",
            SeverityBucket::UnhealthyForSensitive => "Unhealthy for Sensitive (101-150)",
            SeverityBucket::Unhealthy => "Unhealthy (151-200)",
            SeverityBucket::VeryUnhealthy => "Very Unhealthy (201-300)",
            SeverityBucket::Hazardous => "Hazardous (300+)",
        }
    }

    /// Fixed display color.
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            SeverityBucket::Good => Rgb::new(0x00, 0xE4, 0x00),
            SeverityBucket::Moderate => Rgb::new(0xFF, 0xFF, 0x00),
            SeverityBucket::UnhealthyForSensitive => Rgb::new(0xFF, 0x7E, 0x00),
            SeverityBucket::Unhealthy => Rgb::new(0xFF, 0x00, 0x00),
            SeverityBucket::VeryUnhealthy => Rgb::new(0x8F, 0x3F, 0x97),
            SeverityBucket::Hazardous => Rgb::new(0x7E, 0x00, 0x23),
        }
    }
}

impl fmt::Display for SeverityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeverityBucket {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_status(s).ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// Render a status name for display by replacing underscores with spaces.
#[must_use]
pub fn status_label(status: &str) -> String {
    status.replace('_', " ")
}

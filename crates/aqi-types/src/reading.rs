//! Readings as produced by the prediction backend.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::category::SeverityBucket;
use crate::error::ParseError;

/// Prediction cadence assumed when a reading does not state one.
pub const DEFAULT_PREDICTION_INTERVAL_MINUTES: u32 = 15;

/// Timestamp attached to a reading.
///
/// The backend emits either RFC 3339 values with an offset, or naive
/// ISO-8601 date-times in the server's local wall-clock time. Naive values
/// are displayed unchanged; offset values are shifted to the viewer's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingTime {
    /// Timestamp with an explicit UTC offset.
    Offset(OffsetDateTime),
    /// Server wall-clock time without an offset.
    Local(PrimitiveDateTime),
}

impl ReadingTime {
    /// Wall-clock time as seen by a viewer at `offset`.
    #[must_use]
    pub fn to_local(self, offset: UtcOffset) -> PrimitiveDateTime {
        match self {
            ReadingTime::Offset(dt) => {
                let local = dt.to_offset(offset);
                PrimitiveDateTime::new(local.date(), local.time())
            }
            ReadingTime::Local(dt) => dt,
        }
    }

    /// `HH:MM:SS` in the viewer's offset.
    #[must_use]
    pub fn time_of_day(self, offset: UtcOffset) -> String {
        let dt = self.to_local(offset);
        format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second())
    }

    /// `YYYY-MM-DD HH:MM:SS` in the viewer's offset.
    #[must_use]
    pub fn date_time(self, offset: UtcOffset) -> String {
        let dt = self.to_local(offset);
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            dt.year(),
            dt.month() as u8,
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        )
    }
}

impl FromStr for ReadingTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(ReadingTime::Offset(dt));
        }
        let naive = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        PrimitiveDateTime::parse(s, naive)
            .map(ReadingTime::Local)
            .map_err(|_| ParseError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingTime::Offset(dt) => {
                let text = dt.format(&Rfc3339).map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
            ReadingTime::Local(dt) => {
                write!(
                    f,
                    "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                    dt.year(),
                    dt.month() as u8,
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second()
                )?;
                if dt.microsecond() != 0 {
                    write!(f, ".{:06}", dt.microsecond())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for ReadingTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ReadingTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One AQI observation, optionally carrying the model's prediction.
///
/// Readings are replaced wholesale by each poll, never merged.
///
/// Deserialization accepts both the flat shape
/// (`{"aqi", "predicted_status", "probabilities", "timestamp"}`) and the
/// nested real-time shape (`{"realtime_aqi", "prediction": {...}}`).
/// Serialization always produces the flat shape.
///
/// ```
/// use aqi_types::{Reading, SeverityBucket};
///
/// let reading: Reading = serde_json::from_str(
///     r#"{"aqi": 72.6, "predicted_status": "Moderate", "timestamp": "2025-03-01T10:15:00"}"#,
/// ).unwrap();
/// assert_eq!(reading.rounded_aqi(), 73);
/// assert_eq!(reading.category(), SeverityBucket::Moderate);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ReadingWire"))]
pub struct Reading {
    /// Raw AQI value.
    pub aqi: f64,
    /// Status name predicted by the model (e.g. `Unhealthy_for_Sensitive`).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub predicted_status: Option<String>,
    /// Probability per status name, each in `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub probabilities: Option<BTreeMap<String, f64>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<ReadingTime>,
    /// Prediction cadence reported by the backend, in minutes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub prediction_interval_minutes: Option<u32>,
}

/// History entries share the reading shape.
pub type HistoryEntry = Reading;

impl Reading {
    /// Create a reading with only an AQI value.
    #[must_use]
    pub fn new(aqi: f64) -> Self {
        Self {
            aqi,
            ..Self::default()
        }
    }

    /// Set the predicted status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.predicted_status = Some(status.into());
        self
    }

    /// Set the probability table.
    #[must_use]
    pub fn with_probabilities<K: Into<String>>(
        mut self,
        probabilities: impl IntoIterator<Item = (K, f64)>,
    ) -> Self {
        self.probabilities = Some(
            probabilities
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        );
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: ReadingTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// AQI rounded half-up to an integer for display.
    #[must_use]
    pub fn rounded_aqi(&self) -> i64 {
        round_half_up(self.aqi)
    }

    /// Severity bucket computed from the raw AQI.
    #[must_use]
    pub fn category(&self) -> SeverityBucket {
        SeverityBucket::from_aqi(self.aqi)
    }

    /// Whether the model has produced a prediction for this reading.
    #[must_use]
    pub fn has_prediction(&self) -> bool {
        self.predicted_status
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Status name to display: the predicted status when present, otherwise
    /// the computed bucket's name.
    #[must_use]
    pub fn status_name(&self) -> &str {
        match self.predicted_status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => self.category().wire_name(),
        }
    }

    /// Probabilities ordered by descending value.
    ///
    /// Ties keep their name order.
    #[must_use]
    pub fn sorted_probabilities(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .probabilities
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    /// Prediction cadence in minutes, falling back to the default.
    #[must_use]
    pub fn prediction_interval(&self) -> u32 {
        self.prediction_interval_minutes
            .unwrap_or(DEFAULT_PREDICTION_INTERVAL_MINUTES)
    }
}

/// Round halves toward positive infinity. Non-finite values round to 0.
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}

/// A raw sensor sample from the AQI history endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawReading {
    #[cfg_attr(feature = "serde", serde(alias = "AQI"))]
    pub aqi: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub timestamp: Option<ReadingTime>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum ReadingWire {
    Nested(NestedReading),
    Flat(FlatReading),
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct NestedReading {
    realtime_aqi: f64,
    #[serde(default)]
    timestamp: Option<ReadingTime>,
    #[serde(default)]
    prediction: Option<NestedPrediction>,
    #[serde(default)]
    prediction_interval_minutes: Option<u32>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct NestedPrediction {
    #[serde(default)]
    predicted_status: Option<String>,
    #[serde(default)]
    probabilities: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    timestamp: Option<ReadingTime>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct FlatReading {
    #[serde(alias = "AQI")]
    aqi: f64,
    #[serde(default)]
    predicted_status: Option<String>,
    #[serde(default)]
    probabilities: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    timestamp: Option<ReadingTime>,
    #[serde(default)]
    prediction_interval_minutes: Option<u32>,
}

#[cfg(feature = "serde")]
impl From<ReadingWire> for Reading {
    fn from(wire: ReadingWire) -> Self {
        match wire {
            ReadingWire::Flat(flat) => Reading {
                aqi: flat.aqi,
                predicted_status: flat.predicted_status,
                probabilities: flat.probabilities,
                timestamp: flat.timestamp,
                prediction_interval_minutes: flat.prediction_interval_minutes,
            },
            ReadingWire::Nested(nested) => {
                let (predicted_status, probabilities, predicted_at) = match nested.prediction {
                    Some(p) => (p.predicted_status, p.probabilities, p.timestamp),
                    None => (None, None, None),
                };
                Reading {
                    aqi: nested.realtime_aqi,
                    predicted_status,
                    probabilities,
                    timestamp: predicted_at.or(nested.timestamp),
                    prediction_interval_minutes: Some(
                        nested
                            .prediction_interval_minutes
                            .unwrap_or(DEFAULT_PREDICTION_INTERVAL_MINUTES),
                    ),
                }
            }
        }
    }
}

/// Connection state derived from the latest-reading fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConnectionState {
    /// No fetch attempted yet.
    #[default]
    Disconnected,
    /// Backend reachable but no reading produced yet.
    Waiting,
    /// Latest fetch returned a reading.
    Connected,
    /// Latest fetch failed.
    Error,
}

impl ConnectionState {
    /// Label shown in the dashboard header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Waiting => "Waiting for data...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Error => "Connection Error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_parse_naive_timestamp() {
        let ts: ReadingTime = "2025-03-01T10:15:30.123456".parse().unwrap();
        assert_eq!(ts, ReadingTime::Local(datetime!(2025-03-01 10:15:30.123456)));

        let ts: ReadingTime = "2025-03-01T10:15:30".parse().unwrap();
        assert_eq!(ts, ReadingTime::Local(datetime!(2025-03-01 10:15:30)));
    }

    #[test]
    fn test_parse_offset_timestamp() {
        let ts: ReadingTime = "2025-03-01T10:15:30Z".parse().unwrap();
        assert_eq!(ts, ReadingTime::Offset(datetime!(2025-03-01 10:15:30 UTC)));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        assert!("yesterday".parse::<ReadingTime>().is_err());
        assert!("2025-03-01".parse::<ReadingTime>().is_err());
    }

    #[test]
    fn test_naive_time_is_not_shifted() {
        let ts: ReadingTime = "2025-03-01T10:15:30".parse().unwrap();
        assert_eq!(ts.time_of_day(offset!(+5)), "10:15:30");
    }

    #[test]
    fn test_offset_time_is_shifted() {
        let ts: ReadingTime = "2025-03-01T23:15:30Z".parse().unwrap();
        assert_eq!(ts.time_of_day(offset!(+2)), "01:15:30");
        assert_eq!(ts.date_time(offset!(+2)), "2025-03-02 01:15:30");
    }

    #[test]
    fn test_timestamp_display() {
        let ts: ReadingTime = "2025-03-01T10:15:30.500000".parse().unwrap();
        assert_eq!(ts.to_string(), "2025-03-01T10:15:30.500000");
        let ts: ReadingTime = "2025-03-01T10:15:30".parse().unwrap();
        assert_eq!(ts.to_string(), "2025-03-01T10:15:30");
    }

    #[test]
    fn test_deserialize_flat_reading() {
        let json = r#"{
            "aqi": 120.0,
            "predicted_status": "Unhealthy_for_Sensitive",
            "probabilities": {"Moderate": 0.2, "Unhealthy_for_Sensitive": 0.8},
            "timestamp": "2025-03-01T10:15:30.123456"
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.aqi, 120.0);
        assert_eq!(reading.status_name(), "Unhealthy_for_Sensitive");
        assert_eq!(reading.probabilities.as_ref().map(|p| p.len()), Some(2));
        assert!(reading.timestamp.is_some());
        assert_eq!(reading.prediction_interval_minutes, None);
    }

    #[test]
    fn test_deserialize_nested_reading() {
        let json = r#"{
            "realtime_aqi": 42.0,
            "timestamp": "2025-03-01T10:00:00",
            "prediction": {
                "predicted_status": "Good",
                "probabilities": {"Good": 0.9, "Moderate": 0.1},
                "timestamp": "2025-03-01T09:45:00"
            }
        }"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.aqi, 42.0);
        assert_eq!(reading.predicted_status.as_deref(), Some("Good"));
        assert_eq!(
            reading.timestamp,
            Some(ReadingTime::Local(datetime!(2025-03-01 09:45:00)))
        );
        assert_eq!(reading.prediction_interval(), 15);
    }

    #[test]
    fn test_deserialize_nested_without_prediction() {
        let json = r#"{"realtime_aqi": 180.4, "timestamp": "2025-03-01T10:00:00", "prediction_interval_minutes": 30}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert!(!reading.has_prediction());
        assert_eq!(reading.status_name(), "Unhealthy");
        assert_eq!(reading.prediction_interval(), 30);
        assert_eq!(
            reading.timestamp,
            Some(ReadingTime::Local(datetime!(2025-03-01 10:00:00)))
        );
    }

    #[test]
    fn test_serialize_is_flat() {
        let reading = Reading::new(55.0).with_status("Moderate");
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(value, serde_json::json!({"aqi": 55.0, "predicted_status": "Moderate"}));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(Reading::new(72.5).rounded_aqi(), 73);
        assert_eq!(Reading::new(72.49).rounded_aqi(), 72);
        assert_eq!(Reading::new(-0.5).rounded_aqi(), 0);
        assert_eq!(Reading::new(f64::NAN).rounded_aqi(), 0);
    }

    #[test]
    fn test_empty_status_falls_back_to_category() {
        let reading = Reading::new(260.0).with_status("");
        assert!(!reading.has_prediction());
        assert_eq!(reading.status_name(), "Very_Unhealthy");
    }

    #[test]
    fn test_sorted_probabilities_descending() {
        let reading = Reading::new(80.0).with_probabilities([
            ("Good", 0.1),
            ("Moderate", 0.7),
            ("Unhealthy", 0.2),
        ]);
        let sorted = reading.sorted_probabilities();
        let names: Vec<&str> = sorted.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["Moderate", "Unhealthy", "Good"]);
        assert!(Reading::new(1.0).sorted_probabilities().is_empty());
    }

    #[test]
    fn test_raw_reading_accepts_uppercase_key() {
        let raw: RawReading =
            serde_json::from_str(r#"{"AQI": 33.0, "timestamp": "2025-03-01T10:00:00"}"#).unwrap();
        assert_eq!(raw.aqi, 33.0);
        assert!(raw.timestamp.is_some());
    }

    #[test]
    fn test_connection_labels() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert_eq!(ConnectionState::Waiting.label(), "Waiting for data...");
        assert_eq!(ConnectionState::Error.to_string(), "Connection Error");
    }
}

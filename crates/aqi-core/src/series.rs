//! Chart data derived from the prediction history.
//!
//! History arrives most recent first. The line chart wants it oldest first,
//! and the two distribution charts want tallies by status name and by AQI
//! range. Everything here is a pure function of the history list.

use aqi_types::{
    HistoryEntry, RawReading, Rgb, SeverityBucket, round_half_up, status_color, status_label,
};
use time::UtcOffset;

/// Label used for entries without a timestamp.
pub const MISSING_TIME: &str = "--:--:--";

/// One point of the AQI line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    /// Time of day in the viewer's offset.
    pub time: String,
    /// AQI rounded for display.
    pub aqi: i64,
    /// Status name: the predicted status, or the computed bucket name.
    pub status: String,
}

impl SeriesPoint {
    /// Status with underscores shown as spaces.
    pub fn status_label(&self) -> String {
        status_label(&self.status)
    }
}

/// One slice of a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub color: Rgb,
}

/// A set of slices over the same history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub slices: Vec<Slice>,
    /// Number of entries tallied.
    pub total: usize,
}

impl Distribution {
    /// Share of `slice` as a whole percentage.
    pub fn percent(&self, slice: &Slice) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (100.0 * slice.count as f64 / self.total as f64).round() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Convert most-recent-first history into an oldest-first series.
pub fn chronological_series(entries: &[HistoryEntry], offset: UtcOffset) -> Vec<SeriesPoint> {
    entries
        .iter()
        .rev()
        .map(|entry| SeriesPoint {
            time: entry
                .timestamp
                .map(|ts| ts.time_of_day(offset))
                .unwrap_or_else(|| MISSING_TIME.to_string()),
            aqi: entry.rounded_aqi(),
            status: entry.status_name().to_string(),
        })
        .collect()
}

/// Tally entries by status name, in order of first appearance.
pub fn status_distribution(entries: &[HistoryEntry]) -> Distribution {
    let mut tallies: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        let status = entry.status_name();
        match tallies.iter_mut().find(|(name, _)| *name == status) {
            Some((_, count)) => *count += 1,
            None => tallies.push((status, 1)),
        }
    }

    Distribution {
        slices: tallies
            .into_iter()
            .map(|(name, count)| Slice {
                label: status_label(name),
                count,
                color: status_color(name),
            })
            .collect(),
        total: entries.len(),
    }
}

/// Tally entries by the fixed AQI ranges, omitting empty ranges.
pub fn range_distribution(entries: &[HistoryEntry]) -> Distribution {
    let mut counts = [0usize; SeverityBucket::ALL.len()];
    for entry in entries {
        let bucket = entry.category();
        if let Some(i) = SeverityBucket::ALL.iter().position(|b| *b == bucket) {
            counts[i] += 1;
        }
    }

    Distribution {
        slices: SeverityBucket::ALL
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(bucket, count)| Slice {
                label: bucket.range_label().to_string(),
                count,
                color: bucket.color(),
            })
            .collect(),
        total: entries.len(),
    }
}

/// Raw sensor values in the order received, rounded and clamped at zero.
pub fn raw_values(raw: &[RawReading]) -> Vec<u64> {
    raw.iter()
        .map(|r| round_half_up(r.aqi).max(0) as u64)
        .collect()
}

/// Everything the history view renders, recomputed when the history changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub points: Vec<SeriesPoint>,
    pub by_status: Distribution,
    pub by_range: Distribution,
}

impl HistorySummary {
    pub fn from_entries(entries: &[HistoryEntry], offset: UtcOffset) -> Self {
        Self {
            points: chronological_series(entries, offset),
            by_status: status_distribution(entries),
            by_range: range_distribution(entries),
        }
    }

    /// Number of readings summarized.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Highest rounded AQI in the series.
    pub fn max_aqi(&self) -> Option<i64> {
        self.points.iter().map(|p| p.aqi).max()
    }
}

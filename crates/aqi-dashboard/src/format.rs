//! Output formatting for the one-shot commands (text and JSON).

use anyhow::{Context, Result};
use aqi_core::{HealthResponse, HistorySummary, Reading};
use aqi_types::{Rgb, status_color, status_label};
use owo_colors::OwoColorize;
use serde::Serialize;
use time::UtcOffset;

/// Pretty-printed JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn paint(text: &str, rgb: Rgb, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        text.truecolor(rgb.r, rgb.g, rgb.b).bold().to_string()
    }
}

fn key(name: &str, no_color: bool) -> String {
    if no_color {
        format!("  {:>12}:  ", name)
    } else {
        format!("  {:>12}:  ", name.dimmed())
    }
}

/// Status badge such as `[Unhealthy for Sensitive]`, colored by status.
#[must_use]
pub fn format_status(status: &str, no_color: bool) -> String {
    let label = format!("[{}]", status_label(status));
    paint(&label, status_color(status), no_color)
}

/// Human-readable rendering of one reading.
#[must_use]
pub fn format_reading_text(reading: &Reading, offset: UtcOffset, no_color: bool) -> String {
    let mut output = String::new();
    let category = reading.category();

    output.push_str(&key("AQI", no_color));
    output.push_str(&format!(
        "{} {}\n",
        paint(&reading.rounded_aqi().to_string(), category.color(), no_color),
        format_status(reading.status_name(), no_color)
    ));
    output.push_str(&key("Category", no_color));
    output.push_str(&format!("{}\n", category.label()));

    if reading.has_prediction() {
        for (status, probability) in reading.sorted_probabilities() {
            output.push_str(&key(&status_label(status), no_color));
            output.push_str(&format!("{:.1}%\n", probability * 100.0));
        }
    } else {
        output.push_str(&key("Prediction", no_color));
        output.push_str(&format!(
            "waiting for first prediction (every {} min)\n",
            reading.prediction_interval()
        ));
    }

    if let Some(ts) = reading.timestamp {
        output.push_str(&key("Last updated", no_color));
        output.push_str(&format!("{}\n", ts.date_time(offset)));
    }

    output
}

/// Tabular rendering of history, most recent first, plus both distributions.
#[must_use]
pub fn format_history_text(entries: &[Reading], offset: UtcOffset, no_color: bool) -> String {
    if entries.is_empty() {
        return "No history available\n".to_string();
    }

    let summary = HistorySummary::from_entries(entries, offset);
    let mut output = format!("  {:<10} {:>5}  {}\n", "TIME", "AQI", "STATUS");
    for point in summary.points.iter().rev() {
        output.push_str(&format!(
            "  {:<10} {:>5}  {}\n",
            point.time,
            point.aqi,
            format_status(&point.status, no_color)
        ));
    }

    for (title, dist) in [
        ("By status", &summary.by_status),
        ("By AQI range", &summary.by_range),
    ] {
        output.push_str(&format!("\n  {}\n", title));
        for slice in &dist.slices {
            output.push_str(&format!(
                "    {} — Count: {} ({}%)\n",
                paint(&slice.label, slice.color, no_color),
                slice.count,
                dist.percent(slice)
            ));
        }
    }
    output.push_str(&format!(
        "\n  Showing distribution of {} readings\n",
        summary.len()
    ));

    output
}

/// Health response as key/value lines.
#[must_use]
pub fn format_health_text(health: &HealthResponse, no_color: bool) -> String {
    let flag = |value: Option<bool>| match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };

    let mut output = String::new();
    output.push_str(&key("Status", no_color));
    let ok = Rgb::new(0x00, 0xE4, 0x00);
    let bad = Rgb::new(0xFF, 0x00, 0x00);
    let color = if health.status.eq_ignore_ascii_case("healthy") {
        ok
    } else {
        bad
    };
    output.push_str(&format!("{}\n", paint(&health.status, color, no_color)));
    output.push_str(&key("Model loaded", no_color));
    output.push_str(&format!("{}\n", flag(health.model_loaded)));
    output.push_str(&key("MQTT", no_color));
    output.push_str(&format!("{}\n", flag(health.mqtt_connected)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi_core::ReadingTime;
    use std::collections::BTreeMap;
    use time::macros::offset;

    fn sample() -> Reading {
        let mut probs = BTreeMap::new();
        probs.insert("Moderate".to_string(), 0.25);
        probs.insert("Unhealthy_for_Sensitive".to_string(), 0.75);
        Reading::new(123.4)
            .with_status("Unhealthy_for_Sensitive")
            .with_probabilities(probs)
            .with_timestamp("2025-03-01T10:15:00".parse::<ReadingTime>().unwrap())
    }

    #[test]
    fn test_format_status_plain() {
        assert_eq!(
            format_status("Unhealthy_for_Sensitive", true),
            "[Unhealthy for Sensitive]"
        );
    }

    #[test]
    fn test_format_status_colored() {
        let colored = format_status("Good", false);
        assert!(colored.contains("\x1b["));
        assert!(colored.contains("[Good]"));
    }

    #[test]
    fn test_reading_text() {
        let text = format_reading_text(&sample(), offset!(UTC), true);
        assert!(text.contains("123 [Unhealthy for Sensitive]"));
        assert!(text.contains("Category:  Unhealthy for Sensitive"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("2025-03-01 10:15:00"));
        let first = text.find("75.0%").unwrap();
        let second = text.find("25.0%").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_reading_text_without_prediction() {
        let text = format_reading_text(&Reading::new(40.0), offset!(UTC), true);
        assert!(text.contains("40 [Good]"));
        assert!(text.contains("every 15 min"));
        assert!(!text.contains("Last updated"));
    }

    #[test]
    fn test_history_text() {
        let entries = vec![
            Reading::new(120.0)
                .with_timestamp("2025-03-01T10:00:02".parse::<ReadingTime>().unwrap()),
            Reading::new(40.0).with_timestamp("2025-03-01T10:00:00".parse::<ReadingTime>().unwrap()),
        ];
        let text = format_history_text(&entries, offset!(UTC), true);
        let newest = text.find("10:00:02").unwrap();
        let oldest = text.find("10:00:00").unwrap();
        assert!(newest < oldest);
        assert!(text.contains("Good — Count: 1 (50%)"));
        assert!(text.contains("Unhealthy for Sensitive — Count: 1 (50%)"));
        assert!(text.contains("Good (0-50) — Count: 1 (50%)"));
        assert!(text.contains("Showing distribution of 2 readings"));
    }

    #[test]
    fn test_history_text_empty() {
        assert_eq!(
            format_history_text(&[], offset!(UTC), true),
            "No history available\n"
        );
    }

    #[test]
    fn test_health_text() {
        let health = HealthResponse {
            status: "healthy".to_string(),
            model_loaded: Some(true),
            mqtt_connected: None,
        };
        let text = format_health_text(&health, true);
        assert!(text.contains("healthy"));
        assert!(text.contains("yes"));
        assert!(text.contains("unknown"));
    }

    #[test]
    fn test_json_output() {
        let json = format_json(&Reading::new(12.0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["aqi"], 12.0);
    }
}

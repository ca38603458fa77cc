//! Color helper functions for the TUI.
//!
//! # AQI Color Coding
//!
//! | Range     | Category                | Color            |
//! |-----------|-------------------------|------------------|
//! | 0-50      | Good                    | `#00E400` green  |
//! | 51-100    | Moderate                | `#FFFF00` yellow |
//! | 101-150   | Unhealthy for Sensitive | `#FF7E00` orange |
//! | 151-200   | Unhealthy               | `#FF0000` red    |
//! | 201-300   | Very Unhealthy          | `#8F3F97` purple |
//! | 301+      | Hazardous               | `#7E0023` maroon |
//!
//! Status names the table does not know render in gray (`#888888`).

use aqi_core::{ConnectionState, Rgb, category_of, status_color};
use ratatui::style::Color;

/// Convert a palette or category color to a terminal color.
#[must_use]
pub fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Color for an AQI value by its category.
#[must_use]
pub fn aqi_color(aqi: f64) -> Color {
    rgb_color(category_of(aqi).color())
}

/// Color for a backend status name.
#[must_use]
pub fn status_name_color(status: &str) -> Color {
    rgb_color(status_color(status))
}

/// Black or white, whichever reads better on `background`.
#[must_use]
pub fn contrast_text(background: Rgb) -> Color {
    // ITU-R BT.601 luma
    let luma = 299 * u32::from(background.r) + 587 * u32::from(background.g) + 114 * u32::from(background.b);
    if luma > 128_000 {
        Color::Black
    } else {
        Color::White
    }
}

/// Indicator color for the connection state.
#[must_use]
pub fn connection_color(state: ConnectionState) -> Color {
    match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Waiting => Color::Yellow,
        ConnectionState::Error => Color::Red,
        ConnectionState::Disconnected => Color::DarkGray,
    }
}

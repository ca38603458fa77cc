//! Centralized theme for the TUI.
//!
//! Neutral colors follow the Tailwind slate scale. The accent color comes
//! from the palette entry selected in the color picker, so borders and
//! titles follow the user's choice.

use aqi_core::PaletteColor;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use super::colors::rgb_color;

/// Application theme with all UI colors.
#[derive(Debug, Clone, Copy)]
pub struct AppTheme {
    /// Accent from the selected palette entry.
    pub accent: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub border_inactive: Color,

    // Background colors
    pub bg_header: Color,
    pub bg_banner: Color,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::with_accent(PaletteColor::default())
    }
}

impl AppTheme {
    /// Dark theme tinted with `accent`.
    #[must_use]
    pub fn with_accent(accent: PaletteColor) -> Self {
        Self {
            accent: rgb_color(accent.rgb()),

            success: Color::Rgb(74, 222, 128), // green-400
            warning: Color::Rgb(251, 191, 36), // amber-400
            danger: Color::Rgb(248, 113, 113), // red-400

            text_primary: Color::Rgb(248, 250, 252),   // slate-50
            text_secondary: Color::Rgb(148, 163, 184), // slate-400
            text_muted: Color::Rgb(100, 116, 139),     // slate-500

            border_inactive: Color::Rgb(71, 85, 105), // slate-600

            bg_header: Color::Rgb(30, 41, 59), // slate-800
            bg_banner: Color::Rgb(127, 29, 29), // red-900
        }
    }

    /// Style for active/focused borders.
    #[inline]
    #[must_use]
    pub fn border_active_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for inactive borders.
    #[inline]
    #[must_use]
    pub fn border_inactive_style(&self) -> Style {
        Style::default().fg(self.border_inactive)
    }

    /// Style for titles.
    #[inline]
    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for header/app bar.
    #[inline]
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default().bg(self.bg_header)
    }

    /// Style for the connection error banner.
    #[inline]
    #[must_use]
    pub fn banner_style(&self) -> Style {
        Style::default()
            .bg(self.bg_banner)
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }
}

/// Default border type for all blocks.
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_follows_palette() {
        let theme = AppTheme::with_accent(PaletteColor::from_index(4).unwrap());
        assert_eq!(theme.accent, Color::Rgb(0xE7, 0x4C, 0x3C));
        assert_eq!(theme.title_style().fg, Some(theme.accent));
    }

    #[test]
    fn test_default_accent_is_cyan() {
        assert_eq!(AppTheme::default().accent, Color::Rgb(0x00, 0xCE, 0xD1));
    }
}

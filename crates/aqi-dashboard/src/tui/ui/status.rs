//! Dashboard tab: the latest reading and the color picker.

use aqi_core::{PaletteColor, Reading, status_color, status_label};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use super::colors::{aqi_color, contrast_text, rgb_color, status_name_color};
use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Width reserved for the status name left of each probability bar.
const PROB_LABEL_WIDTH: u16 = 26;

/// Draw the dashboard tab.
pub(super) fn draw_status_panel(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let show_prediction = app.predicting || app.last_prediction.is_some();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),                                   // Reading
            Constraint::Length(if show_prediction { 3 } else { 0 }), // Manual prediction
            Constraint::Length(6),                                // Color picker
        ])
        .split(area);

    draw_reading(frame, layout[0], app, theme);
    if show_prediction {
        draw_manual_prediction(frame, layout[1], app, theme);
    }
    draw_color_picker(frame, layout[2], app, theme);
}

fn draw_reading(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let block = Block::default()
        .title(" Current Air Quality ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(reading) = app.latest.as_ref() else {
        let waiting = Paragraph::new(Line::from(vec![
            Span::styled(app.spinner_char(), Style::default().fg(theme.accent)),
            Span::raw(" Waiting for data..."),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.text_secondary));
        let center = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(waiting, center[1]);
        return;
    };

    let summary = reading_lines_styled(reading, app, theme);
    let probabilities = reading.sorted_probabilities();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(summary.len() as u16),
            Constraint::Length(1),
            Constraint::Length(probabilities.len() as u16),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(summary).wrap(Wrap { trim: true }),
        rows[0],
    );

    let bar_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); probabilities.len()])
        .split(rows[2]);
    for ((status, probability), row) in probabilities.iter().zip(bar_rows.iter()) {
        draw_probability(frame, *row, status, *probability, theme);
    }
}

fn reading_lines_styled(reading: &Reading, app: &App, theme: &AppTheme) -> Vec<Line<'static>> {
    let status = reading.status_name();
    let badge_bg = status_color(status);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("AQI ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                reading.rounded_aqi().to_string(),
                Style::default()
                    .fg(aqi_color(reading.aqi))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", status_label(status)),
                Style::default()
                    .bg(rgb_color(badge_bg))
                    .fg(contrast_text(badge_bg))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                reading.category().label(),
                Style::default().fg(aqi_color(reading.aqi)),
            ),
        ]),
    ];

    if !reading.has_prediction() {
        lines.push(Line::from(vec![
            Span::styled(app.spinner_char(), Style::default().fg(theme.warning)),
            Span::styled(
                format!(
                    " Waiting for first prediction (every {} min)",
                    reading.prediction_interval()
                ),
                Style::default().fg(theme.warning),
            ),
        ]));
    }

    if let Some(ts) = reading.timestamp {
        lines.push(Line::from(vec![
            Span::styled("Last updated: ", Style::default().fg(theme.text_muted)),
            Span::styled(ts.date_time(app.offset), Style::default().fg(theme.text_secondary)),
        ]));
    }

    lines
}

fn draw_probability(frame: &mut Frame, area: Rect, status: &str, probability: f64, theme: &AppTheme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PROB_LABEL_WIDTH), Constraint::Min(10)])
        .split(area);

    frame.render_widget(
        Paragraph::new(status_label(status)).style(Style::default().fg(theme.text_secondary)),
        cols[0],
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(status_name_color(status)))
        .ratio(probability.clamp(0.0, 1.0))
        .label(format!("{:.1}%", probability * 100.0));
    frame.render_widget(gauge, cols[1]);
}

fn draw_manual_prediction(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let line = if app.predicting {
        Line::from(vec![
            Span::styled(app.spinner_char(), Style::default().fg(theme.accent)),
            Span::raw(" Predicting..."),
        ])
    } else if let Some(result) = app.last_prediction.as_ref() {
        let status = result.status_name();
        Line::from(vec![
            Span::styled(
                format!("AQI {} → ", result.rounded_aqi()),
                Style::default().fg(theme.text_secondary),
            ),
            Span::styled(
                status_label(status),
                Style::default()
                    .fg(status_name_color(status))
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::default()
    };

    let block = Block::default()
        .title(" Manual Prediction ")
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_inactive_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_color_picker(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let picker = &app.picker;
    let title = if picker.is_spinning() {
        " Color Picker (spinning...) ".to_string()
    } else {
        format!(" Color Picker: {} ", picker.selected().name())
    };
    let block = Block::default()
        .title(title)
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut swatches = Vec::new();
    let mut markers = Vec::new();
    let mut keys = Vec::new();
    for color in PaletteColor::all() {
        let rgb = color.rgb();
        let marker = marker_for(color, picker.selected(), picker.highlight(), picker.is_spinning());
        swatches.push(Span::styled("     ", Style::default().bg(rgb_color(rgb))));
        swatches.push(Span::raw(" "));
        markers.push(Span::styled(format!("  {}   ", marker), Style::default().fg(rgb_color(rgb))));
        keys.push(Span::styled(
            format!("  {}   ", color.index()),
            Style::default().fg(theme.text_muted),
        ));
    }

    let hint = if picker.is_spinning() {
        format!(
            "tick {}/{}",
            picker.ticks().unwrap_or(0),
            aqi_core::randomizer::MAX_TICKS
        )
    } else {
        "0-9 select, r randomize".to_string()
    };

    let lines = vec![
        Line::from(swatches),
        Line::from(markers),
        Line::from(keys),
        Line::from(Span::styled(hint, Style::default().fg(theme.text_muted))),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Marker drawn under a swatch.
fn marker_for(
    color: PaletteColor,
    selected: PaletteColor,
    highlight: Option<PaletteColor>,
    spinning: bool,
) -> &'static str {
    if spinning {
        if highlight == Some(color) { "▲" } else { " " }
    } else if color == selected {
        "●"
    } else {
        " "
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn text(reading: &Reading) -> Vec<String> {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let (_event_tx, event_rx) = mpsc::channel(1);
        let app = App::new(cmd_tx, event_rx, "http://localhost:5000");
        reading_lines_styled(reading, &app, &AppTheme::default())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_reading_with_prediction() {
        let reading = Reading::new(123.4).with_status("Unhealthy_for_Sensitive");
        let lines = text(&reading);
        assert_eq!(lines[0], "AQI 123   Unhealthy for Sensitive ");
        assert_eq!(lines[1], "Category: Unhealthy for Sensitive");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_reading_without_prediction() {
        let mut reading = Reading::new(260.0);
        reading.prediction_interval_minutes = Some(10);
        let lines = text(&reading);
        assert!(lines[0].contains("Very Unhealthy"));
        assert!(lines[2].ends_with("Waiting for first prediction (every 10 min)"));
    }

    #[test]
    fn test_category_uses_raw_aqi() {
        let reading = Reading::new(40.0).with_status("Hazardous");
        let lines = text(&reading);
        assert!(lines[0].contains("Hazardous"));
        assert_eq!(lines[1], "Category: Good");
    }

    #[test]
    fn test_marker() {
        let a = PaletteColor::from_index(0).unwrap();
        let b = PaletteColor::from_index(1).unwrap();
        assert_eq!(marker_for(a, a, None, false), "●");
        assert_eq!(marker_for(b, a, None, false), " ");
        assert_eq!(marker_for(b, a, Some(b), true), "▲");
        assert_eq!(marker_for(a, a, Some(b), true), " ");
    }
}

//! History and raw sensor tabs.

use aqi_core::{Distribution, HistorySummary, series};
use ratatui::prelude::*;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Sparkline,
};

use super::colors::{rgb_color, status_name_color};
use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Lowest upper bound for the AQI axis.
const MIN_Y_BOUND: f64 = 50.0;

/// Width of one distribution bar.
const BAR_WIDTH: u16 = 7;

/// Draw the history tab: AQI trend on top, distributions below.
pub(super) fn draw_history_panel(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let summary = &app.summary;
    if summary.is_empty() {
        let block = Block::default()
            .title(" AQI Trend ")
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_inactive_style());
        let empty = Paragraph::new("No data available for chart")
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55), // Trend
            Constraint::Min(8),         // Distributions
            Constraint::Length(1),      // Footer
        ])
        .split(area);

    draw_trend(frame, layout[0], summary, theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    draw_distribution(frame, columns[0], " By Status ", &summary.by_status, theme);
    draw_distribution(frame, columns[1], " By AQI Range ", &summary.by_range, theme);

    let footer = Paragraph::new(format!(
        "Showing distribution of {} readings",
        summary.len()
    ))
    .style(Style::default().fg(theme.text_muted))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

fn draw_trend(frame: &mut Frame, area: Rect, summary: &HistorySummary, theme: &AppTheme) {
    let block = Block::default()
        .title(" AQI Trend ")
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let data = chart_data(summary);
    let y_max = y_upper_bound(summary);
    let x_max = (data.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("AQI")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.accent))
            .data(&data),
    ];

    let x_labels = match (summary.points.first(), summary.latest()) {
        (Some(first), Some(last)) => vec![Span::raw(first.time.clone()), Span::raw(last.time.clone())],
        _ => Vec::new(),
    };
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", y_max / 2.0)),
        Span::raw(format!("{:.0}", y_max)),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.text_muted))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, rows[0]);

    if let Some(point) = summary.latest() {
        let detail = Line::from(vec![
            Span::styled("Time: ", Style::default().fg(theme.text_muted)),
            Span::raw(point.time.clone()),
            Span::styled("  AQI: ", Style::default().fg(theme.text_muted)),
            Span::raw(point.aqi.to_string()),
            Span::styled("  Status: ", Style::default().fg(theme.text_muted)),
            Span::styled(
                point.status_label(),
                Style::default().fg(status_name_color(&point.status)),
            ),
        ]);
        frame.render_widget(Paragraph::new(detail), rows[1]);
    }
}

/// Chart points, oldest first, indexed by position.
pub(crate) fn chart_data(summary: &HistorySummary) -> Vec<(f64, f64)> {
    summary
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.aqi as f64))
        .collect()
}

/// Upper bound of the AQI axis with some headroom above the peak.
pub(crate) fn y_upper_bound(summary: &HistorySummary) -> f64 {
    let peak = summary.max_aqi().unwrap_or(0) as f64;
    (peak * 1.1).max(MIN_Y_BOUND)
}

fn draw_distribution(
    frame: &mut Frame,
    area: Rect,
    title: &'static str,
    distribution: &Distribution,
    theme: &AppTheme,
) {
    let block = Block::default()
        .title(title)
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_inactive_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(distribution.slices.len() as u16),
        ])
        .split(inner);

    let bars: Vec<Bar<'_>> = distribution
        .slices
        .iter()
        .map(|slice| {
            Bar::default()
                .value(slice.count as u64)
                .text_value(format!("{}%", distribution.percent(slice)))
                .label(Line::from(abbreviate(&slice.label, BAR_WIDTH as usize)))
                .style(Style::default().fg(rgb_color(slice.color)))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .value_style(Style::default().fg(theme.text_primary).add_modifier(Modifier::BOLD));
    frame.render_widget(chart, rows[0]);

    let legend: Vec<Line> = distribution
        .slices
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(rgb_color(slice.color))),
                Span::styled(
                    format!("{} — Count: {}", slice.label, slice.count),
                    Style::default().fg(theme.text_secondary),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), rows[1]);
}

/// Shorten `label` to at most `width` characters.
fn abbreviate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Draw the raw sensor tab.
pub(super) fn draw_raw_panel(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let block = Block::default()
        .title(format!(" Raw Sensor ({} samples) ", app.raw_history.len()))
        .title_style(theme.title_style())
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style());

    if app.raw_history.is_empty() {
        let hint = if app.raw_history_polled {
            "Waiting for raw sensor data..."
        } else {
            "No raw sensor data. Press 'u' to fetch, or set raw_history = true in the config."
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let values = series::raw_values(&app.raw_history);
    let stretched = resample(&values, rows[0].width as usize);
    let sparkline = Sparkline::default()
        .data(&stretched)
        .style(Style::default().fg(theme.accent));
    frame.render_widget(sparkline, rows[0]);

    let min = values.iter().min().copied().unwrap_or(0);
    let max = values.iter().max().copied().unwrap_or(0);
    let last = values.last().copied().unwrap_or(0);
    let stats = Line::from(vec![
        Span::styled("Min: ", Style::default().fg(theme.text_muted)),
        Span::raw(min.to_string()),
        Span::styled("  Max: ", Style::default().fg(theme.text_muted)),
        Span::raw(max.to_string()),
        Span::styled("  Last: ", Style::default().fg(theme.text_muted)),
        Span::raw(last.to_string()),
    ]);
    frame.render_widget(Paragraph::new(stats), rows[1]);
}

/// Resample `data` to exactly `width` points so the sparkline fills the row.
///
/// Short series repeat values; long series average into buckets.
pub(crate) fn resample(data: &[u64], width: usize) -> Vec<u64> {
    if data.is_empty() || width == 0 {
        return Vec::new();
    }
    if data.len() == width {
        return data.to_vec();
    }

    if data.len() < width {
        return (0..width)
            .map(|i| data[(i * (data.len() - 1) / (width - 1).max(1)).min(data.len() - 1)])
            .collect();
    }

    let bucket = data.len() as f64 / width as f64;
    (0..width)
        .map(|i| {
            let start = (i as f64 * bucket) as usize;
            let end = (((i + 1) as f64 * bucket) as usize).clamp(start + 1, data.len());
            data[start..end].iter().sum::<u64>() / (end - start) as u64
        })
        .collect()
}

//! Main UI layout and rendering for the TUI dashboard.
//!
//! The layout consists of:
//!
//! - **Header**: Title, connection state, backend URL and current time
//! - **Banner**: Connection error, shown until the next good response
//! - **Tabs**: Dashboard, History and Raw Sensor
//! - **Status bar**: Key hints or the most recent status message

pub mod colors;
pub mod theme;

mod history;
mod status;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use super::app::{App, MAX_INPUT_LEN, Tab};
use colors::connection_color;
use theme::{AppTheme, BORDER_TYPE};

/// Draw the complete TUI interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = AppTheme::with_accent(app.picker.selected());
    let banner_height = if app.banner.is_some() { 3 } else { 0 };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header bar
            Constraint::Length(banner_height), // Error banner
            Constraint::Length(3),             // Tab bar
            Constraint::Min(1),                // Main content
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app, &theme);
    if let Some(banner) = app.banner.as_deref() {
        draw_banner(frame, main_layout[1], banner, &theme);
    }
    draw_tab_bar(frame, main_layout[2], app, &theme);

    match app.active_tab {
        Tab::Dashboard => status::draw_status_panel(frame, main_layout[3], app, &theme),
        Tab::History => history::draw_history_panel(frame, main_layout[3], app, &theme),
        Tab::Raw => history::draw_raw_panel(frame, main_layout[3], app, &theme),
    }

    draw_status_bar(frame, main_layout[4], app, &theme);

    if app.editing_prediction {
        draw_prediction_prompt(frame, app, &theme);
    }
    if app.show_help {
        draw_help_overlay(frame, &theme);
    }
}

/// Draw the header bar with title, connection indicator and backend health.
fn draw_header(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let mut spans = vec![
        Span::styled(
            " AQI Dashboard ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("● ", Style::default().fg(connection_color(app.connection))),
        Span::styled(
            format!("{} ", app.connection.label()),
            Style::default().fg(theme.text_secondary),
        ),
        Span::styled(
            format!(" {} ", app.api_url),
            Style::default().fg(theme.text_muted),
        ),
    ];

    if let Some(health) = app.health.as_ref() {
        let healthy = health.status.eq_ignore_ascii_case("healthy")
            || health.status.eq_ignore_ascii_case("ok");
        spans.push(Span::styled(
            format!(" {} ", health.status),
            Style::default().fg(if healthy { theme.success } else { theme.warning }),
        ));
        if health.model_loaded == Some(false) {
            spans.push(Span::styled(" NO MODEL ", Style::default().fg(theme.danger)));
        }
        if health.mqtt_connected == Some(false) {
            spans.push(Span::styled(" NO MQTT ", Style::default().fg(theme.danger)));
        }
    }

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(theme.header_style()),
        layout[0],
    );
    frame.render_widget(
        Paragraph::new(Local::now().format("%H:%M:%S ").to_string())
            .alignment(Alignment::Right)
            .style(theme.header_style().fg(theme.text_muted)),
        layout[1],
    );
}

fn draw_banner(frame: &mut Frame, area: Rect, message: &str, theme: &AppTheme) {
    let banner = Paragraph::new(message.to_string())
        .style(theme.banner_style())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(Style::default().fg(theme.danger)),
        );
    frame.render_widget(banner, area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.label())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BORDER_TYPE)
                .border_style(theme.border_inactive_style()),
        )
        .select(app.active_tab.index())
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(theme.title_style());
    frame.render_widget(tabs, area);
}

/// Key hints for the active tab.
fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("?", "help")];
    match app.active_tab {
        Tab::Dashboard => {
            hints.push(("0-9", "color"));
            hints.push(("r", "randomize"));
            hints.push(("p", "predict"));
        }
        Tab::History => {}
        Tab::Raw => hints.push(("u", "fetch raw")),
    }
    hints.push(("h", "health"));
    hints.push(("Tab", "switch"));
    hints.push(("q", "quit"));
    hints
}

/// Draw the status bar with a message or context-sensitive hints.
fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &AppTheme) {
    let spans = if let Some(msg) = app.current_status_message() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.text_secondary),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(theme.text_muted),
            ));
        }
        spans
    };
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Rectangle of the given size centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn draw_prediction_prompt(frame: &mut Frame, app: &App, theme: &AppTheme) {
    let area = centered(frame.area(), 44, 5);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("AQI: ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                app.prediction_input.clone(),
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("_", Style::default().fg(theme.accent)),
        ]),
        Line::from(Span::styled(
            format!("Enter submit | Esc cancel | max {} chars", MAX_INPUT_LEN),
            Style::default().fg(theme.text_muted),
        )),
    ];
    let prompt = Paragraph::new(lines).block(
        Block::default()
            .title(" Manual Prediction ")
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_active_style()),
    );
    frame.render_widget(prompt, area);
}

fn shortcut_line<'a>(key: &str, desc: &str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>12} ", key), Style::default().fg(theme.warning)),
        Span::styled(desc.to_string(), Style::default().fg(theme.text_secondary)),
    ])
}

/// Draw help overlay with keyboard shortcuts.
fn draw_help_overlay(frame: &mut Frame, theme: &AppTheme) {
    let area = centered(frame.area(), 50, 16);
    frame.render_widget(Clear, area);

    let lines = vec![
        shortcut_line("0-9", "Select accent color", theme),
        shortcut_line("r", "Randomize accent color", theme),
        shortcut_line("p", "Manual prediction", theme),
        shortcut_line("h", "Check backend health", theme),
        shortcut_line("u", "Fetch raw sensor history", theme),
        shortcut_line("Tab/→", "Next tab", theme),
        shortcut_line("Shift+Tab/←", "Previous tab", theme),
        shortcut_line("Esc", "Close help / dismiss banner", theme),
        shortcut_line("?", "Toggle help", theme),
        shortcut_line("q", "Quit", theme),
    ];
    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme.title_style())
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(theme.border_active_style()),
    );
    frame.render_widget(help, area);
}

//! Application state for the TUI.
//!
//! [`App`] is owned by the event loop and changes only in response to
//! [`MonitorEvent`]s from the background tasks, key presses, and the color
//! picker's deadlines.

use std::time::{Duration, Instant};

use aqi_core::{
    AudioCue, ColorPicker, Command, ConnectionState, HealthResponse, HistoryEntry, HistorySummary,
    MonitorEvent, RawReading, Reading, Silent,
};
use time::UtcOffset;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::errors::format_error_with_guidance;

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Longest manual prediction input accepted.
pub const MAX_INPUT_LEN: usize = 10;

/// UI tab selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Latest reading and color picker.
    #[default]
    Dashboard,
    /// Prediction history charts.
    History,
    /// Raw sensor samples.
    Raw,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::History, Tab::Raw];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::History => "History",
            Tab::Raw => "Raw Sensor",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::History => 1,
            Tab::Raw => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application state.
pub struct App {
    /// Base URL of the backend, shown in the header and the error banner.
    pub api_url: String,
    pub connection: ConnectionState,
    /// Most recent reading received.
    pub latest: Option<Reading>,
    /// Connection error banner.
    pub banner: Option<String>,
    /// History as received, most recent first.
    pub history: Vec<HistoryEntry>,
    /// Chart data derived from `history`.
    pub summary: HistorySummary,
    pub raw_history: Vec<RawReading>,
    /// Whether raw history is polled with the other requests.
    pub raw_history_polled: bool,
    pub picker: ColorPicker,
    pub active_tab: Tab,
    pub show_help: bool,
    /// Whether the manual prediction prompt is open.
    pub editing_prediction: bool,
    pub prediction_input: String,
    /// A manual prediction request is in flight.
    pub predicting: bool,
    /// Result of the last manual prediction.
    pub last_prediction: Option<Reading>,
    pub health: Option<HealthResponse>,
    /// Status messages with the time they were posted.
    pub status_messages: Vec<(String, Instant)>,
    /// Viewer offset used for time labels.
    pub offset: UtcOffset,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub command_tx: mpsc::Sender<Command>,
    pub event_rx: mpsc::Receiver<MonitorEvent>,
}

impl App {
    /// Spinner frames for the waiting indicator.
    const SPINNER: [&'static str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

    /// Create the application state with a silent color picker.
    pub fn new(
        command_tx: mpsc::Sender<Command>,
        event_rx: mpsc::Receiver<MonitorEvent>,
        api_url: impl Into<String>,
    ) -> Self {
        let audio: Box<dyn AudioCue> = Box::new(Silent);
        Self {
            api_url: api_url.into(),
            connection: ConnectionState::Disconnected,
            latest: None,
            banner: None,
            history: Vec::new(),
            summary: HistorySummary::default(),
            raw_history: Vec::new(),
            raw_history_polled: false,
            picker: ColorPicker::new(audio),
            active_tab: Tab::Dashboard,
            show_help: false,
            editing_prediction: false,
            prediction_input: String::new(),
            predicting: false,
            last_prediction: None,
            health: None,
            status_messages: Vec::new(),
            offset: UtcOffset::UTC,
            should_quit: false,
            spinner_frame: 0,
            command_tx,
            event_rx,
        }
    }

    /// Replace the color picker.
    #[must_use]
    pub fn with_picker(mut self, picker: ColorPicker) -> Self {
        self.picker = picker;
        self
    }

    /// Set the offset used for time labels.
    #[must_use]
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Mark raw history as polled.
    #[must_use]
    pub fn with_raw_history(mut self, polled: bool) -> Self {
        self.raw_history_polled = polled;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Text of the connection error banner.
    pub fn connection_error_banner(&self) -> String {
        format!(
            "Failed to connect to API. Make sure the backend server is running on {}",
            self.api_url
        )
    }

    /// Apply one event from the background tasks.
    pub fn handle_monitor_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::LatestReading(reading) => {
                if self.connection != ConnectionState::Connected {
                    info!(aqi = reading.aqi, "Receiving readings");
                }
                self.connection = ConnectionState::Connected;
                self.banner = None;
                self.latest = Some(reading);
            }
            MonitorEvent::NoReadingYet => {
                self.connection = ConnectionState::Waiting;
                self.banner = None;
            }
            MonitorEvent::LatestFailed { error } => {
                if self.connection != ConnectionState::Error {
                    warn!(%error, "Lost connection to backend");
                }
                self.connection = ConnectionState::Error;
                self.banner = Some(self.connection_error_banner());
            }
            MonitorEvent::HistoryUpdated(history) => {
                debug!(entries = history.len(), "History updated");
                self.summary = HistorySummary::from_entries(&history, self.offset);
                self.history = history;
            }
            MonitorEvent::RawHistoryUpdated(raw) => {
                debug!(samples = raw.len(), "Raw history updated");
                self.raw_history = raw;
            }
            MonitorEvent::RawHistoryFailed { error } => {
                self.push_error("Raw history", &error);
            }
            MonitorEvent::PredictionComplete(reading) => {
                self.predicting = false;
                self.push_status_message(format!(
                    "Prediction for AQI {}: {}",
                    reading.rounded_aqi(),
                    aqi_core::status_label(reading.status_name())
                ));
                self.last_prediction = Some(reading);
            }
            MonitorEvent::PredictionFailed { error } => {
                self.predicting = false;
                self.push_error("Prediction", &error);
            }
            MonitorEvent::HealthChecked(health) => {
                self.push_status_message(format!("Backend health: {}", health.status));
                self.health = Some(health);
            }
            MonitorEvent::HealthFailed { error } => {
                self.health = None;
                self.push_error("Health check", &error);
            }
        }
    }

    /// Drain pending events without blocking.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_monitor_event(event);
        }
    }

    /// Drive time-based state: the picker's deadlines and the spinner.
    pub fn tick(&mut self, now: Instant) {
        self.spinner_frame = (self.spinner_frame + 1) % Self::SPINNER.len();
        self.clean_expired_messages(now);
        if let Some(color) = self.picker.advance(now) {
            self.push_status_message(format!("Accent color: {} ({})", color.name(), color));
        }
    }

    pub fn spinner_char(&self) -> &'static str {
        Self::SPINNER[self.spinner_frame]
    }

    /// Push a status message to be displayed.
    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        // Keep only the last few messages
        if self.status_messages.len() > 5 {
            self.status_messages.remove(0);
        }
    }

    fn push_error(&mut self, what: &str, error: &str) {
        let (short, hint) = format_error_with_guidance(error);
        let message = match hint {
            Some(hint) => format!("{} failed: {}. {}", what, short, hint),
            None => format!("{} failed: {}", what, short),
        };
        self.push_status_message(message);
    }

    /// Drop messages older than the display window.
    pub fn clean_expired_messages(&mut self, now: Instant) {
        self.status_messages
            .retain(|(_, posted)| now.saturating_duration_since(*posted) < STATUS_MESSAGE_TTL);
    }

    /// Most recent status message.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    /// Open the manual prediction prompt.
    pub fn start_prediction_input(&mut self) {
        self.editing_prediction = true;
        self.prediction_input.clear();
    }

    pub fn cancel_prediction_input(&mut self) {
        self.editing_prediction = false;
        self.prediction_input.clear();
    }

    /// Append a character to the prompt, accepting only number characters.
    pub fn prediction_input_char(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '.' && !self.prediction_input.contains('.'));
        if accepted && self.prediction_input.len() < MAX_INPUT_LEN {
            self.prediction_input.push(c);
        }
    }

    pub fn prediction_input_backspace(&mut self) {
        self.prediction_input.pop();
    }

    /// Close the prompt and return the command to send, if the input parses.
    pub fn submit_prediction_input(&mut self) -> Option<Command> {
        let parsed = self.prediction_input.parse::<f64>().ok().filter(|v| v.is_finite());
        self.editing_prediction = false;
        let input = std::mem::take(&mut self.prediction_input);
        match parsed {
            Some(aqi) => {
                self.predicting = true;
                Some(Command::Predict { aqi })
            }
            None => {
                self.push_status_message(format!("Not a valid AQI value: '{}'", input));
                None
            }
        }
    }
}

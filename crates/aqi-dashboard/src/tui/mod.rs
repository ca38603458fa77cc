//! Main entry point for the TUI dashboard.
//!
//! This module ties together the TUI components and provides the main
//! event loop. It handles:
//!
//! - Terminal setup and restoration
//! - Channel creation for worker communication
//! - The main event loop with input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod audio;
pub mod errors;
pub mod input;
pub mod ui;
pub mod worker;

pub use app::App;
pub use worker::MonitorWorker;

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use aqi_core::{AqiClient, ColorPicker, Command, MonitorEvent};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::util::local_offset;

/// How long the event loop waits for a key before redrawing.
const FRAME_TIMEOUT: Duration = Duration::from_millis(100);

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application against the backend at `api_url`.
///
/// 1. Creates communication channels between UI and worker
/// 2. Spawns the background worker, which starts polling at once
/// 3. Runs the main event loop
/// 4. Ensures graceful shutdown
pub async fn run(config: &Config, api_url: String) -> Result<()> {
    let client = AqiClient::new(&api_url)
        .with_context(|| format!("Invalid backend URL: {}", api_url))?;
    let api_url = client.base_url().to_string();
    info!(%api_url, "Starting dashboard");

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<MonitorEvent>(32);

    let worker = MonitorWorker::new(Arc::new(client), cmd_rx, event_tx, config.poll_config())
        .raw_history_limit(config.raw_history_limit);
    let worker_handle = tokio::spawn(worker.run());

    let picker = ColorPicker::new(audio::audio_cue(config.sound)).with_selected(config.accent());
    let mut app = App::new(cmd_tx.clone(), event_rx, api_url)
        .with_picker(picker)
        .with_offset(local_offset())
        .with_raw_history(config.raw_history);

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx);

    let _ = cmd_tx.try_send(Command::Shutdown);
    restore_terminal()?;

    app.picker.cancel();
    // In-flight requests must not block on a full event channel
    drop(app);
    let _ = worker_handle.await;

    result
}

/// Main event loop for the TUI.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.tick(Instant::now());

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(FRAME_TIMEOUT)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code, app.editing_prediction);
            if let Some(cmd) = input::apply_action(app, action) {
                let _ = command_tx.try_send(cmd);
            }
        }

        app.drain_events();
    }

    Ok(())
}

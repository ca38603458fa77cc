//! Background worker for backend requests.
//!
//! The [`MonitorWorker`] owns the poller and runs user-triggered requests
//! off the UI task. It communicates with the UI over channels:
//!
//! - Receives [`Command`]s from the UI
//! - Sends [`MonitorEvent`]s back, alongside the poller's own events
//!
//! Each command runs in its own task, so a slow prediction never holds up
//! a health check or shutdown.

use std::sync::Arc;

use aqi_core::{AqiSource, Command, MonitorEvent, PollConfig, Poller};
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Background worker that handles backend requests.
pub struct MonitorWorker<S: AqiSource + ?Sized + 'static> {
    source: Arc<S>,
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<MonitorEvent>,
    poll_config: PollConfig,
    /// Sample count for on-demand raw history requests.
    raw_history_limit: usize,
}

impl<S: AqiSource + ?Sized + 'static> MonitorWorker<S> {
    /// Create a new worker.
    ///
    /// # Arguments
    ///
    /// * `source` - Backend to poll and send requests to
    /// * `command_rx` - Channel receiver for commands from the UI
    /// * `event_tx` - Channel sender for events to the UI
    /// * `poll_config` - Cadence and limits for the poller
    pub fn new(
        source: Arc<S>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<MonitorEvent>,
        poll_config: PollConfig,
    ) -> Self {
        let raw_history_limit = poll_config.raw_history_limit.unwrap_or(50);
        Self {
            source,
            command_rx,
            event_tx,
            poll_config,
            raw_history_limit,
        }
    }

    /// Set the sample count for on-demand raw history requests.
    #[must_use]
    pub fn raw_history_limit(mut self, limit: usize) -> Self {
        self.raw_history_limit = limit.max(1);
        self
    }

    /// Run the worker until a [`Command::Shutdown`] arrives or the UI hangs up.
    pub async fn run(mut self) {
        info!(endpoint = self.source.endpoint(), "Monitor worker started");

        let poller = Poller::new(
            Arc::clone(&self.source),
            self.poll_config.clone(),
            self.event_tx.clone(),
        )
        .spawn();
        let tasks = TaskTracker::new();

        while let Some(cmd) = self.command_rx.recv().await {
            if cmd == Command::Shutdown {
                info!("Monitor worker shutting down");
                break;
            }
            self.handle_command(cmd, &tasks);
        }

        poller.shutdown().await;
        tasks.close();
        tasks.wait().await;
        info!("Monitor worker stopped");
    }

    fn handle_command(&self, cmd: Command, tasks: &TaskTracker) {
        debug!(?cmd, "Handling command");
        let source = Arc::clone(&self.source);
        let events = self.event_tx.clone();
        let raw_limit = self.raw_history_limit;

        tasks.spawn(async move {
            let event = match cmd {
                Command::Predict { aqi } => match source.submit_manual_prediction(aqi).await {
                    Ok(reading) => MonitorEvent::PredictionComplete(reading),
                    Err(e) => MonitorEvent::PredictionFailed {
                        error: e.to_string(),
                    },
                },
                Command::CheckHealth => match source.health().await {
                    Ok(health) => MonitorEvent::HealthChecked(health),
                    Err(e) => MonitorEvent::HealthFailed {
                        error: e.to_string(),
                    },
                },
                Command::RefreshRawHistory => match source.fetch_raw_history(raw_limit).await {
                    Ok(raw) => MonitorEvent::RawHistoryUpdated(raw),
                    Err(e) => MonitorEvent::RawHistoryFailed {
                        error: e.to_string(),
                    },
                },
                Command::Shutdown => return,
            };
            // The UI may already be gone
            let _ = events.send(event).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use aqi_core::MockSource;
    use tokio::time::timeout;

    async fn next_matching<F: Fn(&MonitorEvent) -> bool>(
        rx: &mut mpsc::Receiver<MonitorEvent>,
        pred: F,
    ) -> MonitorEvent {
        timeout(Duration::from_secs(5), async {
            loop {
                let event = rx.recv().await.expect("channel closed");
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("no matching event")
    }

    fn spawn_worker(
        source: Arc<MockSource>,
    ) -> (
        mpsc::Sender<Command>,
        mpsc::Receiver<MonitorEvent>,
        tokio::task::JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(64);
        let worker = MonitorWorker::new(source, cmd_rx, event_tx, PollConfig::default());
        (cmd_tx, event_rx, tokio::spawn(worker.run()))
    }

    #[tokio::test]
    async fn test_polls_on_start() {
        let source = Arc::new(MockSource::new());
        let (cmd_tx, mut event_rx, handle) = spawn_worker(source.clone());

        next_matching(&mut event_rx, |e| matches!(e, MonitorEvent::NoReadingYet)).await;
        assert!(source.latest_calls() >= 1);

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_predict_command() {
        let source = Arc::new(MockSource::new());
        let (cmd_tx, mut event_rx, handle) = spawn_worker(source.clone());

        cmd_tx.send(Command::Predict { aqi: 175.0 }).await.unwrap();
        let event = next_matching(&mut event_rx, |e| {
            matches!(e, MonitorEvent::PredictionComplete(_))
        })
        .await;
        match event {
            MonitorEvent::PredictionComplete(reading) => {
                assert_eq!(reading.predicted_status.as_deref(), Some("Unhealthy"));
            }
            other => panic!("Expected PredictionComplete, got {:?}", other),
        }

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_prediction_reports_failure() {
        let source = Arc::new(MockSource::new());
        let (cmd_tx, mut event_rx, handle) = spawn_worker(source.clone());

        cmd_tx.send(Command::Predict { aqi: f64::NAN }).await.unwrap();
        next_matching(&mut event_rx, |e| {
            matches!(e, MonitorEvent::PredictionFailed { .. })
        })
        .await;
        assert_eq!(source.predictions(), 0);

        drop(cmd_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_health_and_raw_history_commands() {
        let source = Arc::new(MockSource::new());
        let (cmd_tx, mut event_rx, handle) = spawn_worker(source.clone());

        cmd_tx.send(Command::CheckHealth).await.unwrap();
        next_matching(&mut event_rx, |e| matches!(e, MonitorEvent::HealthChecked(_))).await;

        cmd_tx.send(Command::RefreshRawHistory).await.unwrap();
        next_matching(&mut event_rx, |e| {
            matches!(e, MonitorEvent::RawHistoryUpdated(_))
        })
        .await;
        assert_eq!(source.raw_history_calls(), 1);

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_polling() {
        let source = Arc::new(MockSource::new());
        let (cmd_tx, mut event_rx, handle) = spawn_worker(source.clone());
        next_matching(&mut event_rx, |e| matches!(e, MonitorEvent::NoReadingYet)).await;

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
        let calls = source.latest_calls();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(source.latest_calls(), calls);
    }
}

//! Fixed-cadence polling of the prediction backend.
//!
//! A [`Poller`] runs one cycle immediately and then one per interval. Each
//! cycle fetches the latest reading and the history as independent tasks,
//! and each task publishes its own [`MonitorEvent`] when it resolves, so a
//! slow history request never delays the latest reading.
//!
//! Stopping the poller (via [`PollerHandle::stop`] or by dropping the
//! handle) cancels the timer right away. Fetches already in flight run to
//! completion but their results are discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::messages::MonitorEvent;
use crate::traits::AqiSource;

/// Default time between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of history entries requested per cycle.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polling parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between cycles. Clamped to [`MIN_POLL_INTERVAL`].
    pub interval: Duration,
    /// History entries requested per cycle.
    pub history_limit: usize,
    /// Raw sensor samples requested per cycle, or `None` to skip them.
    pub raw_history_limit: Option<usize>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            history_limit: DEFAULT_HISTORY_LIMIT,
            raw_history_limit: None,
        }
    }
}

impl PollConfig {
    /// Set the poll interval.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the history limit.
    #[must_use]
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Also poll the raw sensor history.
    #[must_use]
    pub fn raw_history_limit(mut self, limit: Option<usize>) -> Self {
        self.raw_history_limit = limit;
        self
    }
}

/// Repeating fetch loop over an [`AqiSource`].
pub struct Poller<S: AqiSource + ?Sized + 'static> {
    source: Arc<S>,
    config: PollConfig,
    events: mpsc::Sender<MonitorEvent>,
}

/// Handle to a running [`Poller`].
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Stop the timer. No events are published after this returns.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the poll loop is still active.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop and wait for the poll loop to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<S: AqiSource + ?Sized + 'static> Poller<S> {
    /// Create a poller publishing into `events`.
    pub fn new(source: Arc<S>, config: PollConfig, events: mpsc::Sender<MonitorEvent>) -> Self {
        Self {
            source,
            config,
            events,
        }
    }

    /// Start polling on the current tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        PollerHandle {
            cancel,
            task: Some(task),
        }
    }

    async fn run(self, cancel: CancellationToken) {
        let period = self.config.interval.max(MIN_POLL_INTERVAL);
        info!(
            endpoint = self.source.endpoint(),
            interval_ms = period.as_millis() as u64,
            history_limit = self.config.history_limit,
            "Polling started"
        );

        // The first tick completes immediately
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    cycle += 1;
                    debug!(cycle, "Poll tick");
                    self.spawn_cycle(&cancel);
                }
            }
        }

        info!(cycles = cycle, "Polling stopped");
    }

    fn spawn_cycle(&self, cancel: &CancellationToken) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let event = match source.fetch_latest().await {
                Ok(Some(reading)) => MonitorEvent::LatestReading(reading),
                Ok(None) => MonitorEvent::NoReadingYet,
                Err(e) => MonitorEvent::LatestFailed {
                    error: e.to_string(),
                },
            };
            publish(&token, &events, event).await;
        });

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let token = cancel.clone();
        let limit = self.config.history_limit;
        tokio::spawn(async move {
            match source.fetch_history(limit).await {
                Ok(history) => publish(&token, &events, MonitorEvent::HistoryUpdated(history)).await,
                Err(e) => warn!(error = %e, "History refresh failed, keeping previous history"),
            }
        });

        if let Some(limit) = self.config.raw_history_limit {
            let source = Arc::clone(&self.source);
            let events = self.events.clone();
            let token = cancel.clone();
            tokio::spawn(async move {
                match source.fetch_raw_history(limit).await {
                    Ok(raw) => publish(&token, &events, MonitorEvent::RawHistoryUpdated(raw)).await,
                    Err(e) => warn!(error = %e, "Raw history refresh failed"),
                }
            });
        }
    }
}

/// Send `event` unless the poller was stopped. A closed channel is ignored.
async fn publish(
    cancel: &CancellationToken,
    events: &mpsc::Sender<MonitorEvent>,
    event: MonitorEvent,
) {
    if cancel.is_cancelled() {
        debug!("Poller stopped, dropping late result");
        return;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {}
        _ = events.send(event) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSource;
    use aqi_types::Reading;

    fn drain(rx: &mut mpsc::Receiver<MonitorEvent>) -> Vec<MonitorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn count<F: Fn(&MonitorEvent) -> bool>(events: &[MonitorEvent], pred: F) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_is_immediate() {
        let source = Arc::new(MockSource::new());
        source.set_latest(Some(Reading::new(42.0))).await;
        source.set_history(vec![Reading::new(42.0)]).await;
        let (tx, mut rx) = mpsc::channel(32);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let events = drain(&mut rx);
        assert_eq!(count(&events, |e| matches!(e, MonitorEvent::LatestReading(_))), 1);
        assert_eq!(count(&events, |e| matches!(e, MonitorEvent::HistoryUpdated(_))), 1);
        assert_eq!(source.latest_calls(), 1);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_cycle_per_interval() {
        let source = Arc::new(MockSource::new());
        let (tx, mut rx) = mpsc::channel(64);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(4100)).await;

        // t = 0, 2000, 4000
        assert_eq!(source.latest_calls(), 3);
        assert_eq!(source.history_calls(), 3);
        let events = drain(&mut rx);
        assert_eq!(count(&events, |e| matches!(e, MonitorEvent::NoReadingYet)), 3);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_events_after_stop() {
        let source = Arc::new(MockSource::new());
        let (tx, mut rx) = mpsc::channel(64);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.stop();
        assert!(!handle.is_running());
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.latest_calls(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_results_dropped_after_stop() {
        let source = Arc::new(MockSource::new());
        source.set_latest(Some(Reading::new(10.0))).await;
        source.set_latency(Duration::from_millis(500));
        let (tx, mut rx) = mpsc::channel(64);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.latest_calls(), 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_latest_keeps_polling() {
        let source = Arc::new(MockSource::new());
        source.set_fail_latest(true);
        let (tx, mut rx) = mpsc::channel(64);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let events = drain(&mut rx);
        assert_eq!(
            count(&events, |e| matches!(e, MonitorEvent::LatestFailed { .. })),
            2
        );
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_history_publishes_nothing() {
        let source = Arc::new(MockSource::new());
        source.set_latest(Some(Reading::new(10.0))).await;
        source.set_fail_history(true);
        let (tx, mut rx) = mpsc::channel(64);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        let events = drain(&mut rx);
        assert_eq!(count(&events, |e| matches!(e, MonitorEvent::HistoryUpdated(_))), 0);
        assert_eq!(count(&events, |e| matches!(e, MonitorEvent::LatestReading(_))), 2);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_history_polled_when_enabled() {
        let source = Arc::new(MockSource::new());
        let (tx, mut rx) = mpsc::channel(64);
        let config = PollConfig::default().raw_history_limit(Some(50));

        let handle = Poller::new(source.clone(), config, tx).spawn();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(source.raw_history_calls(), 1);
        let events = drain(&mut rx);
        assert_eq!(
            count(&events, |e| matches!(e, MonitorEvent::RawHistoryUpdated(_))),
            1
        );
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_is_ignored() {
        let source = Arc::new(MockSource::new());
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let handle = Poller::new(source.clone(), PollConfig::default(), tx).spawn();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(source.latest_calls(), 2);
        assert!(handle.is_running());
        handle.shutdown().await;
    }
}

//! In-memory backend for testing.
//!
//! [`MockSource`] implements [`AqiSource`] without any network access.
//!
//! # Features
//!
//! - **Failure injection**: make the latest or history fetch fail
//! - **Latency simulation**: delay every response (honors paused tokio time)
//! - **Call counting**: observe how often each endpoint was hit

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aqi_types::{HistoryEntry, RawReading, Reading};

use crate::client::{ClientError, HealthResponse, Result};
use crate::traits::AqiSource;

/// A fake prediction backend.
///
/// ```
/// use aqi_core::{AqiSource, MockSource};
/// use aqi_types::Reading;
///
/// #[tokio::main]
/// async fn main() {
///     let source = MockSource::new();
///     assert!(source.fetch_latest().await.unwrap().is_none());
///
///     source.set_latest(Some(Reading::new(42.0))).await;
///     assert_eq!(source.fetch_latest().await.unwrap().unwrap().aqi, 42.0);
/// }
/// ```
#[derive(Debug)]
pub struct MockSource {
    latest: RwLock<Option<Reading>>,
    history: RwLock<Vec<HistoryEntry>>,
    raw_history: RwLock<Vec<RawReading>>,
    fail_latest: AtomicBool,
    fail_history: AtomicBool,
    fail_message: RwLock<String>,
    latency_ms: AtomicU64,
    latest_calls: AtomicU32,
    history_calls: AtomicU32,
    raw_history_calls: AtomicU32,
    predictions: AtomicU32,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a backend with no readings.
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
            history: RwLock::new(Vec::new()),
            raw_history: RwLock::new(Vec::new()),
            fail_latest: AtomicBool::new(false),
            fail_history: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            latency_ms: AtomicU64::new(0),
            latest_calls: AtomicU32::new(0),
            history_calls: AtomicU32::new(0),
            raw_history_calls: AtomicU32::new(0),
            predictions: AtomicU32::new(0),
        }
    }

    /// Replace the latest reading.
    pub async fn set_latest(&self, reading: Option<Reading>) {
        *self.latest.write().await = reading;
    }

    /// Replace the history (most recent first).
    pub async fn set_history(&self, history: Vec<HistoryEntry>) {
        *self.history.write().await = history;
    }

    /// Replace the raw sensor history.
    pub async fn set_raw_history(&self, history: Vec<RawReading>) {
        *self.raw_history.write().await = history;
    }

    /// Make the latest fetch fail (or succeed again).
    pub fn set_fail_latest(&self, fail: bool) {
        self.fail_latest.store(fail, Ordering::Relaxed);
    }

    /// Make the history fetches fail (or succeed again).
    pub fn set_fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::Relaxed);
    }

    /// Message carried by injected failures.
    pub async fn set_fail_message(&self, message: &str) {
        *self.fail_message.write().await = message.to_string();
    }

    /// Delay every response.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of latest fetches served so far.
    pub fn latest_calls(&self) -> u32 {
        self.latest_calls.load(Ordering::Relaxed)
    }

    /// Number of history fetches served so far.
    pub fn history_calls(&self) -> u32 {
        self.history_calls.load(Ordering::Relaxed)
    }

    /// Number of raw history fetches served so far.
    pub fn raw_history_calls(&self) -> u32 {
        self.raw_history_calls.load(Ordering::Relaxed)
    }

    /// Number of manual predictions served so far.
    pub fn predictions(&self) -> u32 {
        self.predictions.load(Ordering::Relaxed)
    }

    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::Relaxed);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    async fn failure(&self) -> ClientError {
        ClientError::ApiError {
            status: 503,
            message: self.fail_message.read().await.clone(),
        }
    }

    fn check_limit(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(ClientError::InvalidArgument(
                "history limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AqiSource for MockSource {
    fn endpoint(&self) -> &str {
        "mock://backend"
    }

    async fn fetch_latest(&self) -> Result<Option<Reading>> {
        self.latest_calls.fetch_add(1, Ordering::Relaxed);
        self.simulate_latency().await;
        if self.fail_latest.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        Ok(self.latest.read().await.clone())
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Self::check_limit(limit)?;
        self.history_calls.fetch_add(1, Ordering::Relaxed);
        self.simulate_latency().await;
        if self.fail_history.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        Ok(self.history.read().await.iter().take(limit).cloned().collect())
    }

    async fn fetch_raw_history(&self, limit: usize) -> Result<Vec<RawReading>> {
        Self::check_limit(limit)?;
        self.raw_history_calls.fetch_add(1, Ordering::Relaxed);
        self.simulate_latency().await;
        if self.fail_history.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        Ok(self
            .raw_history
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn submit_manual_prediction(&self, aqi: f64) -> Result<Reading> {
        if !aqi.is_finite() {
            return Err(ClientError::InvalidArgument(format!(
                "AQI must be a finite number, got {aqi}"
            )));
        }
        self.predictions.fetch_add(1, Ordering::Relaxed);
        self.simulate_latency().await;
        let reading = Reading::new(aqi);
        let status = reading.category().wire_name();
        Ok(reading.with_status(status))
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.simulate_latency().await;
        Ok(HealthResponse {
            status: "healthy".to_string(),
            model_loaded: Some(true),
            mqtt_connected: Some(!self.fail_latest.load(Ordering::Relaxed)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_history_respects_limit() {
        let source = MockSource::new();
        source
            .set_history((0..5).map(|i| Reading::new(i as f64)).collect())
            .await;

        let history = source.fetch_history(3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].aqi, 0.0);
        assert_eq!(source.history_calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let source = MockSource::new();
        source.set_fail_latest(true);
        source.set_fail_message("boom").await;

        let err = source.fetch_latest().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("boom"));

        source.set_fail_latest(false);
        assert!(source.fetch_latest().await.is_ok());
        assert_eq!(source.latest_calls(), 2);
    }

    #[tokio::test]
    async fn test_manual_prediction_uses_category() {
        let source = MockSource::new();
        let reading = source.submit_manual_prediction(175.0).await.unwrap();
        assert_eq!(reading.predicted_status.as_deref(), Some("Unhealthy"));
        assert!(source.submit_manual_prediction(f64::INFINITY).await.is_err());
        assert_eq!(source.predictions(), 1);
    }
}

//! Trait abstraction over the prediction backend.
//!
//! [`AqiSource`] lets the poller and the dashboard worker run against the
//! real HTTP client or against [`MockSource`](crate::mock::MockSource) in tests.

use async_trait::async_trait;

use aqi_types::{HistoryEntry, RawReading, Reading};

use crate::client::{AqiClient, HealthResponse, Result};

/// Operations the dashboard needs from a prediction backend.
///
/// # Example
///
/// ```ignore
/// use aqi_core::{AqiSource, Result};
///
/// async fn print_latest<S: AqiSource>(source: &S) -> Result<()> {
///     if let Some(reading) = source.fetch_latest().await? {
///         println!("AQI: {}", reading.rounded_aqi());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait AqiSource: Send + Sync {
    /// Human-readable location of the backend, used in error banners.
    fn endpoint(&self) -> &str;

    /// Latest reading, or `None` if the backend has not produced one yet.
    async fn fetch_latest(&self) -> Result<Option<Reading>>;

    /// Up to `limit` history entries, most recent first.
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Up to `limit` raw sensor samples.
    async fn fetch_raw_history(&self, limit: usize) -> Result<Vec<RawReading>>;

    /// Classify a manually entered AQI value.
    async fn submit_manual_prediction(&self, aqi: f64) -> Result<Reading>;

    /// Backend health.
    async fn health(&self) -> Result<HealthResponse>;
}

#[async_trait]
impl AqiSource for AqiClient {
    fn endpoint(&self) -> &str {
        self.base_url()
    }

    async fn fetch_latest(&self) -> Result<Option<Reading>> {
        AqiClient::fetch_latest(self).await
    }

    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        AqiClient::fetch_history(self, limit).await
    }

    async fn fetch_raw_history(&self, limit: usize) -> Result<Vec<RawReading>> {
        AqiClient::fetch_raw_history(self, limit).await
    }

    async fn submit_manual_prediction(&self, aqi: f64) -> Result<Reading> {
        AqiClient::submit_manual_prediction(self, aqi).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        AqiClient::health(self).await
    }
}

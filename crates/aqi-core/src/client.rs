//! HTTP client for the AQI prediction backend.
//!
//! The backend exposes a small REST surface: the latest reading, the
//! prediction history, the raw sensor history, a manual prediction endpoint
//! and a health check. Every failure is logged at `warn` before being
//! returned so callers can decide how to surface it.
//!
//! # Example
//!
//! ```no_run
//! use aqi_core::client::AqiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AqiClient::new("http://localhost:5000")?;
//!
//! match client.fetch_latest().await? {
//!     Some(reading) => println!("AQI {}", reading.rounded_aqi()),
//!     None => println!("No reading yet"),
//! }
//!
//! let history = client.fetch_history(20).await?;
//! println!("{} history entries", history.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use aqi_types::{HistoryEntry, RawReading, Reading};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the prediction backend.
#[derive(Debug, Clone)]
pub struct AqiClient {
    client: Client,
    base_url: String,
}

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend is not reachable.
    #[error("Backend not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed, or the body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

impl ClientError {
    /// HTTP status code, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiError { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(default)]
    pub mqtt_connected: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse<T> {
    history: Vec<T>,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    #[serde(rename = "AQI")]
    aqi: f64,
}

impl AqiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute base URL of the backend (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Request)?;

        Self::with_client(base_url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the most recent reading.
    ///
    /// Returns `Ok(None)` when the backend answers 404, meaning no reading
    /// has been produced yet.
    pub async fn fetch_latest(&self) -> Result<Option<Reading>> {
        let url = format!("{}/latest", self.base_url);
        let response = self.send(self.client.get(&url), &url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "No reading available yet");
            return Ok(None);
        }

        self.handle_response(response, &url).await.map(Some)
    }

    /// Fetch up to `limit` history entries, most recent first.
    pub async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        if limit == 0 {
            return Err(ClientError::InvalidArgument(
                "history limit must be greater than zero".to_string(),
            ));
        }

        let url = format!("{}/history?limit={}", self.base_url, limit);
        let response = self.send(self.client.get(&url), &url).await?;
        let body: HistoryResponse<HistoryEntry> = self.handle_response(response, &url).await?;
        Ok(body.history)
    }

    /// Fetch up to `limit` raw sensor samples.
    pub async fn fetch_raw_history(&self, limit: usize) -> Result<Vec<RawReading>> {
        if limit == 0 {
            return Err(ClientError::InvalidArgument(
                "history limit must be greater than zero".to_string(),
            ));
        }

        let url = format!("{}/aqi-history?limit={}", self.base_url, limit);
        let response = self.send(self.client.get(&url), &url).await?;
        let body: HistoryResponse<RawReading> = self.handle_response(response, &url).await?;
        Ok(body.history)
    }

    /// Ask the backend to classify a manually entered AQI value.
    pub async fn submit_manual_prediction(&self, aqi: f64) -> Result<Reading> {
        if !aqi.is_finite() {
            return Err(ClientError::InvalidArgument(format!(
                "AQI must be a finite number, got {aqi}"
            )));
        }

        let url = format!("{}/predict", self.base_url);
        let request = self.client.post(&url).json(&PredictRequest { aqi });
        let response = self.send(request, &url).await?;
        self.handle_response(response, &url).await
    }

    /// Get backend health.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.send(self.client.get(&url), &url).await?;
        self.handle_response(response, &url).await
    }

    /// Check if the backend is reachable.
    pub async fn is_reachable(&self) -> bool {
        self.health().await.is_ok()
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            warn!(%url, error = %e, "Backend request failed");
            ClientError::NotReachable {
                url: url.to_string(),
                source: e,
            }
        })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                warn!(%url, error = %e, "Failed to decode backend response");
                ClientError::Request(e)
            });
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| status.to_string());

        warn!(%url, status = status.as_u16(), %message, "Backend returned an error");
        Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

/// Trim trailing slashes and require an `http(s)://` scheme.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

fn error_message(body: &serde_json::Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}

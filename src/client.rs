//! HTTP client module for delivering readings to the collection endpoint.
//!
//! Each reading gets exactly one POST attempt. The outcome is handed back to
//! the caller; deciding what to do on failure is the emitter's job.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::reading::SensorReading;

/// Errors that can occur while delivering a reading.
#[derive(Debug)]
pub enum ClientError {
    /// Connection-level failure (refused, DNS, reset, ...)
    Request(reqwest::Error),

    /// Request did not complete within the configured timeout
    Timeout,

    /// Reading could not be encoded as JSON
    Serialize(String),

    /// Client configuration error
    Config(String),
}

impl ClientError {
    /// Whether the error means the endpoint could not be reached.
    ///
    /// These are the failures the emitter degrades to its fallback sink for.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Request(_) | ClientError::Timeout)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Request(e) => write!(f, "HTTP request failed: {}", e),
            ClientError::Timeout => write!(f, "Request timed out"),
            ClientError::Serialize(e) => write!(f, "Failed to serialize reading: {}", e),
            ClientError::Config(e) => write!(f, "Client configuration error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Request(err)
        }
    }
}

/// Encode a reading as the JSON body sent to the endpoint.
///
/// The same text is what the fallback sink receives, so it is pretty-printed
/// for people reading the console.
pub fn to_payload(reading: &SensorReading) -> Result<String, ClientError> {
    serde_json::to_string_pretty(reading).map_err(|e| ClientError::Serialize(e.to_string()))
}

/// HTTP client for posting readings.
///
/// The underlying `reqwest::Client` is built once and reused across ticks.
///
/// # Example
///
/// ```no_run
/// use sensor_emitter::client::{to_payload, ReadingClient};
/// use sensor_emitter::config::Config;
/// use sensor_emitter::reading::generate;
///
/// #[tokio::main]
/// async fn main() {
///     let config = Config::default();
///     let client = ReadingClient::new(&config).expect("Failed to create client");
///
///     let payload = to_payload(&generate(&config.sensor_id)).unwrap();
///     match client.send_payload(&payload).await {
///         Ok(status) => println!("Delivered ({})", status),
///         Err(e) => eprintln!("Failed to send: {}", e),
///     }
/// }
/// ```
pub struct ReadingClient {
    client: Client,
    target_url: String,
    timeout: Duration,
}

impl ReadingClient {
    /// Create a client for the endpoint and timeout in `config`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Self::with_settings(config.target_url.clone(), config.request_timeout)
    }

    /// Create a client with explicit settings.
    pub fn with_settings(
        target_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            client,
            target_url: target_url.into(),
            timeout,
        })
    }

    /// POST a pre-encoded JSON payload once.
    ///
    /// Any HTTP response counts as delivered and yields its status code,
    /// error statuses included. Only failures to get a response at all are
    /// returned as errors. The response is released before returning.
    pub async fn send_payload(&self, payload: &str) -> Result<StatusCode, ClientError> {
        debug!(
            url = %self.target_url,
            bytes = payload.len(),
            "Posting reading"
        );

        let response = self
            .client
            .post(&self.target_url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_owned())
            .send()
            .await?;

        let status = response.status();
        drop(response);

        Ok(status)
    }

    /// Encode and POST a reading once.
    pub async fn send(&self, reading: &SensorReading) -> Result<StatusCode, ClientError> {
        let payload = to_payload(reading)?;
        self.send_payload(&payload).await
    }

    /// Get the configured target URL.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Get the request timeout duration.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

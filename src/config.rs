//! Configuration module for the sensor emitter.
//!
//! Settings are read once from environment variables at startup. Malformed
//! values never abort the process: they are reported and replaced with the
//! documented default.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default collection endpoint.
pub const DEFAULT_TARGET_URL: &str = "http://localhost:8000/api/data";

/// Default sensor identity.
pub const DEFAULT_SENSOR_ID: &str = "test-sensor-01";

/// Default time between two readings.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(30);

/// Default ceiling for a single POST, so a stalled endpoint cannot hold up the next tick.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const TARGET_URL_VAR: &str = "TARGET_URL";
pub const SENSOR_ID_VAR: &str = "SENSOR_ID";
pub const SEND_INTERVAL_VAR: &str = "SEND_INTERVAL";
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT_SECS";

/// Configuration for the sensor emitter.
///
/// All settings can be configured via environment variables:
/// - `TARGET_URL`: collection endpoint (default: http://localhost:8000/api/data)
/// - `SENSOR_ID`: identity stamped on every reading (default: test-sensor-01)
/// - `SEND_INTERVAL`: seconds, or a duration like `30s` / `15m` (default: 30s)
/// - `REQUEST_TIMEOUT_SECS`: HTTP request timeout (default: 5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Full URL readings are POSTed to
    pub target_url: String,

    /// Sensor identity, constant for the process lifetime
    pub sensor_id: String,

    /// Time between the start of two consecutive ticks
    pub send_interval: Duration,

    /// Upper bound for one delivery attempt
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sensor_emitter::config::Config;
    ///
    /// let config = Config::from_env();
    /// println!("Target: {}", config.target_url);
    /// ```
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let target_url = get(TARGET_URL_VAR).unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
        let sensor_id = get(SENSOR_ID_VAR).unwrap_or_else(|| DEFAULT_SENSOR_ID.to_string());

        let send_interval = effective_interval(get(SEND_INTERVAL_VAR).as_deref());

        let request_timeout = match get(REQUEST_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        env_var = REQUEST_TIMEOUT_VAR,
                        value = %raw,
                        default_secs = DEFAULT_REQUEST_TIMEOUT.as_secs(),
                        "Invalid request timeout, using default"
                    );
                    DEFAULT_REQUEST_TIMEOUT
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Self {
            target_url,
            sensor_id,
            send_interval,
            request_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            sensor_id: DEFAULT_SENSOR_ID.to_string(),
            send_interval: DEFAULT_SEND_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Parse a send interval.
///
/// Accepts a bare number of seconds (`"45"`) or a humantime duration
/// (`"30s"`, `"15m"`, `"1h 30m"`). Returns `None` for anything else,
/// including a zero interval.
pub fn parse_interval(raw: &str) -> Option<Duration> {
    let raw = raw.trim();

    let parsed = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw).ok()?,
    };

    if parsed.is_zero() {
        None
    } else {
        Some(parsed)
    }
}

/// Resolve an optional raw interval to the one the emitter will use.
///
/// Unset means the default; an unparseable value is reported and also
/// replaced with the default.
pub fn effective_interval(raw: Option<&str>) -> Duration {
    let Some(raw) = raw else {
        return DEFAULT_SEND_INTERVAL;
    };

    parse_interval(raw).unwrap_or_else(|| {
        warn!(
            env_var = SEND_INTERVAL_VAR,
            value = %raw,
            default_secs = DEFAULT_SEND_INTERVAL.as_secs(),
            "Unparseable send interval, using default"
        );
        DEFAULT_SEND_INTERVAL
    })
}

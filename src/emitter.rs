//! Emitter module driving the generate → send → handle-outcome loop.
//!
//! One reading is produced and delivered per tick. Ticks run back to back on
//! a fixed interval and never overlap; no error leaves a tick.

use reqwest::StatusCode;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::client::{to_payload, ClientError, ReadingClient};
use crate::config::Config;
use crate::reading::{ReadingGenerator, ThreadRngSource, UniformSource};
use crate::sink::{ConsoleSink, FallbackSink};

/// What happened to the reading produced by one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The endpoint answered, with any status code
    Delivered { status: StatusCode },

    /// The endpoint could not be reached; the payload went to the fallback sink
    Fallback { error: ClientError },

    /// The reading could not be encoded; nothing was sent
    Dropped { error: ClientError },
}

impl TickOutcome {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TickOutcome::Delivered { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TickOutcome::Fallback { .. })
    }
}

/// Statistics about emitter operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitterStats {
    /// Total number of ticks run
    pub ticks: u64,

    /// Ticks where the endpoint answered with a 2xx status
    pub delivered: u64,

    /// Ticks where the endpoint answered with a non-2xx status
    pub error_statuses: u64,

    /// Ticks whose reading went to the fallback sink
    pub fallbacks: u64,

    /// Ticks whose reading could not be encoded
    pub dropped: u64,
}

/// Periodic reading emitter.
///
/// # Example
///
/// ```no_run
/// use sensor_emitter::config::Config;
/// use sensor_emitter::emitter::Emitter;
///
/// #[tokio::main]
/// async fn main() {
///     let config = Config::from_env();
///     let mut emitter = Emitter::from_config(config).expect("Failed to create emitter");
///     emitter.run().await;
/// }
/// ```
pub struct Emitter<S, K> {
    config: Config,
    client: ReadingClient,
    generator: ReadingGenerator<S>,
    sink: K,
    stats: EmitterStats,
}

impl Emitter<ThreadRngSource, ConsoleSink> {
    /// Create an emitter with the thread RNG and the console fallback sink.
    pub fn from_config(config: Config) -> Result<Self, ClientError> {
        let client = ReadingClient::new(&config)?;
        Ok(Self::new(
            config,
            client,
            ReadingGenerator::with_thread_rng(),
            ConsoleSink::stdout(),
        ))
    }
}

impl<S, K> Emitter<S, K>
where
    S: UniformSource,
    K: FallbackSink,
{
    pub fn new(
        config: Config,
        client: ReadingClient,
        generator: ReadingGenerator<S>,
        sink: K,
    ) -> Self {
        Self {
            config,
            client,
            generator,
            sink,
            stats: EmitterStats::default(),
        }
    }

    /// Run forever: one tick immediately, then one per send interval.
    pub async fn run(&mut self) {
        self.run_ticks(None).await;
    }

    /// Run exactly `ticks` ticks on the configured cadence, then return.
    pub async fn run_for(&mut self, ticks: u64) {
        self.run_ticks(Some(ticks)).await;
    }

    async fn run_ticks(&mut self, limit: Option<u64>) {
        let mut ticker = interval(self.config.send_interval);
        // A slow tick pushes the schedule back instead of causing a burst.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut remaining = limit;
        loop {
            if remaining == Some(0) {
                break;
            }
            ticker.tick().await;
            self.tick().await;
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
        }
    }

    /// Generate one reading and attempt to deliver it.
    pub async fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let reading = self.generator.generate(&self.config.sensor_id);

        let payload = match to_payload(&reading) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, timestamp = %reading.timestamp, "Skipping reading");
                self.stats.dropped += 1;
                return TickOutcome::Dropped { error: e };
            }
        };

        match self.client.send_payload(&payload).await {
            Ok(status) if status.is_success() => {
                self.stats.delivered += 1;
                info!(
                    timestamp = %reading.timestamp,
                    status = %status,
                    "Transmission OK"
                );
                TickOutcome::Delivered { status }
            }
            Ok(status) => {
                self.stats.error_statuses += 1;
                warn!(
                    timestamp = %reading.timestamp,
                    status = %status,
                    "Endpoint rejected reading"
                );
                TickOutcome::Delivered { status }
            }
            Err(e) => {
                self.stats.fallbacks += 1;
                self.sink.emit(&payload, &e);
                TickOutcome::Fallback { error: e }
            }
        }
    }

    /// Get current emitter statistics.
    pub fn stats(&self) -> &EmitterStats {
        &self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

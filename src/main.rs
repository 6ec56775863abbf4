//! Sensor Emitter - synthetic environmental sensor for load-testing ingestion
//!
//! Fabricates a particulate/CO2/climate reading on a fixed interval and POSTs
//! it as JSON to a collection endpoint. When the endpoint cannot be reached
//! the reading is dumped to the console instead and the loop carries on.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `TARGET_URL`: Collection endpoint (default: http://localhost:8000/api/data)
//! - `SENSOR_ID`: Sensor identity (default: test-sensor-01)
//! - `SEND_INTERVAL`: Seconds or duration such as `15m` (default: 30s)
//! - `REQUEST_TIMEOUT_SECS`: HTTP request timeout (default: 5)
//! - `RUST_LOG`: Logging level filter (default: info)

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sensor_emitter::config::Config;
use sensor_emitter::emitter::Emitter;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with environment filter
    init_tracing();

    let mut emitter = match Emitter::from_config(Config::from_env()) {
        Ok(emitter) => emitter,
        Err(e) => {
            error!(error = %e, "Failed to create HTTP client");
            std::process::exit(1);
        }
    };

    let config = emitter.config();
    info!(
        sensor_id = %config.sensor_id,
        target_url = %config.target_url,
        interval = %humantime::format_duration(config.send_interval),
        request_timeout_secs = config.request_timeout.as_secs(),
        "Simulation start"
    );

    info!("Sensor emitter running. Press Ctrl+C to stop.");
    let signal_lost = tokio::select! {
        _ = emitter.run() => false,
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => {
                info!("Shutdown signal received, stopping...");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for shutdown signal");
                true
            }
        },
    };

    // Without a signal handler the process can only be killed externally.
    if signal_lost {
        emitter.run().await;
    }

    let stats = emitter.stats();
    info!(
        ticks = stats.ticks,
        delivered = stats.delivered,
        error_statuses = stats.error_statuses,
        fallbacks = stats.fallbacks,
        "Sensor emitter stopped"
    );
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

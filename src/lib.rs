//! Sensor Emitter Library
//!
//! Components for a synthetic environmental sensor that posts readings to an
//! HTTP collection endpoint:
//!
//! - **config**: Environment-based configuration with fallback defaults
//! - **reading**: Synthetic reading generation with injectable randomness
//! - **client**: Single-attempt JSON delivery over HTTP
//! - **sink**: Fallback destinations for undeliverable readings
//! - **emitter**: The tick-driven generate/send loop
//!
//! # Example
//!
//! ```no_run
//! use sensor_emitter::config::Config;
//! use sensor_emitter::emitter::Emitter;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Load configuration from environment
//!     let config = Config::from_env();
//!
//!     // Console fallback, thread RNG
//!     let mut emitter = Emitter::from_config(config).expect("Failed to create client");
//!
//!     // One reading per interval, forever
//!     emitter.run().await;
//! }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod emitter;
pub mod reading;
pub mod sink;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root for convenience
pub use client::{ClientError, ReadingClient};
pub use config::Config;
pub use emitter::{Emitter, EmitterStats, TickOutcome};
pub use reading::{
    generate, RandSource, ReadingGenerator, SensorReading, ThreadRngSource, UniformSource,
};
pub use sink::{ConsoleSink, FallbackSink, MemorySink};

//! Fallback sinks for readings that could not be delivered.
//!
//! When the endpoint is unreachable the emitter hands the already-encoded
//! payload to a sink instead of dropping it.

use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::client::ClientError;

/// Line written after every console fallback record.
pub const SEPARATOR: &str = "--------------------------------------------------";

/// Destination for readings whose delivery failed at the connection level.
pub trait FallbackSink {
    /// Record a payload that could not be delivered.
    fn emit(&self, payload: &str, error: &ClientError);
}

/// Writes undeliverable payloads to a console-like writer, stdout by default.
///
/// The JSON goes out verbatim, followed by a separator line, so it can be
/// scraped or piped; the accompanying warning goes through `tracing`.
#[derive(Debug)]
pub struct ConsoleSink<W = Stdout> {
    out: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for ConsoleSink<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Run `f` against the underlying writer.
    pub fn with_output<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *out)
    }
}

impl<W: Write> FallbackSink for ConsoleSink<W> {
    fn emit(&self, payload: &str, error: &ClientError) {
        warn!(error = %error, "Connection error, dumping reading to console");

        let written = self.with_output(|out| {
            writeln!(out, "{}\n{}", payload, SEPARATOR)?;
            out.flush()
        });
        if let Err(e) = written {
            warn!(error = %e, "Failed to write fallback record");
        }
    }
}

/// Keeps undeliverable payloads in memory.
///
/// Clones share the same storage, so a handle kept by the caller sees what
/// the emitter recorded.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads recorded so far, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FallbackSink for MemorySink {
    fn emit(&self, payload: &str, _error: &ClientError) {
        if let Ok(mut records) = self.records.lock() {
            records.push(payload.to_string());
        }
    }
}

impl<T: FallbackSink + ?Sized> FallbackSink for Box<T> {
    fn emit(&self, payload: &str, error: &ClientError) {
        (**self).emit(payload, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit("{\"a\":1}", &ClientError::Timeout);
        sink.emit("{\"a\":2}", &ClientError::Timeout);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records(), vec!["{\"a\":1}", "{\"a\":2}"]);
    }

    #[test]
    fn test_memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.emit("payload", &ClientError::Timeout);
        assert_eq!(handle.records(), vec!["payload"]);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let sink = MemorySink::new();
        let boxed: Box<dyn FallbackSink> = Box::new(sink.clone());

        boxed.emit("boxed", &ClientError::Timeout);
        assert_eq!(sink.records(), vec!["boxed"]);
    }

    #[test]
    fn test_console_sink_writes_payload_then_separator() {
        let sink = ConsoleSink::with_writer(Vec::new());

        sink.emit("{\"a\": 1}", &ClientError::Timeout);
        sink.emit("{\"a\": 2}", &ClientError::Timeout);

        let text = sink.with_output(|buf| String::from_utf8(buf.clone()).unwrap());
        let expected = format!("{{\"a\": 1}}\n{sep}\n{{\"a\": 2}}\n{sep}\n", sep = SEPARATOR);
        assert_eq!(text, expected);
    }

    #[test]
    fn test_console_sink_defaults_to_stdout() {
        let sink: ConsoleSink = ConsoleSink::default();
        sink.emit("{}", &ClientError::Config("test".to_string()));
    }
}

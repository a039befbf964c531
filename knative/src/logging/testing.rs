//! Helpers for asserting on log output in tests.
use super::{Config, Logger};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// An in-memory log sink. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct LogBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Every line that parses as a JSON log entry.
    pub fn entries(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Entries logged at `level`, e.g. `"WARN"`.
    pub fn entries_at(&self, level: &str) -> Vec<serde_json::Value> {
        self.entries()
            .into_iter()
            .filter(|entry| entry["level"] == level)
            .collect()
    }
}

pub struct LogBufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}

/// A debug level JSON logger for `component` writing into the returned buffer.
pub fn test_logger(component: &str) -> (Logger, LogBuffer) {
    let buffer = LogBuffer::default();
    let config = Config {
        logging_config: r#"{"level":"debug","encoding":"json"}"#.to_string(),
        ..Default::default()
    };
    (Logger::with_writer(&config, component, buffer.clone()), buffer)
}

//! Logging setup and the in-memory log buffer.
//!
//! Every log line goes to two places:
//!
//! 1. stderr, through the usual `tracing_subscriber::fmt` layer, and
//! 2. a bounded [`LogBuffer`] through [`LogBufferLayer`], so the `get_logs`
//!    command can show recent activity without reading a log file.
//!
//! # How a tracing layer works (for beginners)
//!
//! `tracing` separates *producing* events (`info!`, `warn!`, ...) from
//! *consuming* them.  A subscriber is built from stacked layers; each layer's
//! `on_event` sees every event that passes the filter.  Our layer extracts
//! the message and structured fields with a [`Visit`] implementation and
//! appends one [`LogEntry`] to the ring buffer.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Number of entries kept by default.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Crate prefix whose events are buffered at every level.
const OWN_TARGET_PREFIX: &str = "osckey";

/// Log severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            Level::DEBUG => LogLevel::Debug,
            Level::TRACE => LogLevel::Trace,
        }
    }
}

/// A single buffered log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub level: LogLevel,
    /// Module path that produced the event.
    pub target: String,
    /// The message followed by `key=value` fields.
    pub message: String,
}

/// Thread-safe ring buffer for log entries; the oldest entry is evicted
/// once `capacity` is reached.
#[derive(Debug)]
pub struct LogBuffer {
    entries: RwLock<VecDeque<LogEntry>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

/// A [`tracing_subscriber::Layer`] that mirrors events into a [`LogBuffer`].
///
/// Events from other crates are only kept at `WARN` and above so that
/// dependency chatter does not push our own lines out of the buffer.
pub struct LogBufferLayer {
    buffer: Arc<LogBuffer>,
}

impl LogBufferLayer {
    pub fn new(buffer: Arc<LogBuffer>) -> Self {
        Self { buffer }
    }
}

/// Visitor for extracting the message field from events.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for LogBufferLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if !target.starts_with(OWN_TARGET_PREFIX) && *metadata.level() > Level::WARN {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = if visitor.message.is_empty() {
            metadata.name().to_string()
        } else {
            visitor.message
        };
        for (name, value) in &visitor.fields {
            let _ = write!(message, " {name}={value}");
        }

        self.buffer.push(LogEntry {
            timestamp_ms: now_ms(),
            level: LogLevel::from(*metadata.level()),
            target: target.to_string(),
            message,
        });
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Installs the global subscriber: `RUST_LOG` if set, else `default_level`,
/// writing to stderr and to `buffer`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(default_level: &str, buffer: Arc<LogBuffer>) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(LogBufferLayer::new(buffer))
        .try_init()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, info, warn};
    use tracing_subscriber::layer::SubscriberExt;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp_ms: 0,
            level: LogLevel::Info,
            target: "osckey".into(),
            message: message.into(),
        }
    }

    fn capture<F: FnOnce()>(f: F) -> Arc<LogBuffer> {
        let buffer = Arc::new(LogBuffer::new(16));
        let subscriber =
            tracing_subscriber::registry().with(LogBufferLayer::new(Arc::clone(&buffer)));
        tracing::subscriber::with_default(subscriber, f);
        buffer
    }

    // ── Ring buffer ───────────────────────────────────────────────────────────

    #[test]
    fn test_buffer_evicts_oldest_when_full() {
        // Arrange
        let buffer = LogBuffer::new(2);

        // Act
        buffer.push(entry("one"));
        buffer.push(entry("two"));
        buffer.push(entry("three"));

        // Assert
        let messages: Vec<String> = buffer.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_default_capacity_is_500() {
        let buffer = LogBuffer::default();
        for i in 0..600 {
            buffer.push(entry(&i.to_string()));
        }

        assert_eq!(buffer.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(buffer.entries()[0].message, "100");
    }

    #[test]
    fn test_zero_capacity_buffer_stays_empty() {
        let buffer = LogBuffer::new(0);
        buffer.push(entry("dropped"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear_empties_buffer() {
        let buffer = LogBuffer::new(4);
        buffer.push(entry("x"));
        buffer.clear();
        assert!(buffer.is_empty());
    }

    // ── Layer ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_layer_records_message_level_and_fields() {
        // Act
        let buffer = capture(|| {
            info!(address = "/key/save", "OSC received");
            warn!("no shortcut for message");
        });

        // Assert
        let entries = buffer.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[0].message, "OSC received address=/key/save");
        assert_eq!(entries[1].level, LogLevel::Warn);
        assert!(entries[0].target.starts_with("osckey"));
    }

    #[test]
    fn test_layer_drops_verbose_events_from_other_crates() {
        let buffer = capture(|| {
            debug!(target: "mio::poll", "registering");
            warn!(target: "hyper", "connection reset");
            debug!("ours");
        });

        let targets: Vec<String> = buffer.entries().into_iter().map(|e| e.target).collect();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], "hyper");
    }

    #[test]
    fn test_log_level_serializes_uppercase() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"WARN\"");
    }
}

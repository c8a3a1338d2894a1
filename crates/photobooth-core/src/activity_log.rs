//! Activity log - bounded ring of recent booth activity.
//!
//! Entries are mirrored to `tracing` and, once a sink is attached, pushed to
//! connected clients as `log` events. The sink is attached after construction
//! because the log exists before the event hub does.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::event::now_millis;

/// Default number of retained entries
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// Log entry severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug details
    Debug,
    /// Normal operation
    Info,
    /// Something was ignored or degraded
    Warn,
    /// Operation failed
    Error,
}

/// Single activity log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Human-readable message
    pub message: String,
    /// Subsystem that produced the entry (camera, trigger, imaging, ...)
    pub source: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Receiver of new log entries
pub trait LogSink: Send + Sync {
    /// Publish a freshly recorded entry
    fn publish(&self, entry: &LogEntry);
}

/// Bounded in-memory activity log
pub struct ActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    sink: RwLock<Option<Arc<dyn LogSink>>>,
}

impl ActivityLog {
    /// Create a log retaining up to `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            sink: RwLock::new(None),
        }
    }

    /// Attach the sink that receives every subsequent entry
    pub fn set_sink(&self, sink: Arc<dyn LogSink>) {
        *self.sink.write().unwrap_or_else(|e| e.into_inner()) = Some(sink);
    }

    /// Record an entry
    pub fn add(&self, level: LogLevel, source: &str, message: impl fmt::Display) {
        let entry = LogEntry {
            level,
            message: message.to_string(),
            source: source.to_string(),
            timestamp: now_millis(),
        };

        match level {
            LogLevel::Debug => debug!(source, "{}", entry.message),
            LogLevel::Info => info!(source, "{}", entry.message),
            LogLevel::Warn => warn!(source, "{}", entry.message),
            LogLevel::Error => error!(source, "{}", entry.message),
        }

        {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if entries.len() >= self.capacity {
                // drop the oldest tenth in one go
                let drop = (self.capacity / 10).max(1);
                let n = drop.min(entries.len());
                entries.drain(..n);
            }
            entries.push_back(entry.clone());
        }

        let sink = self.sink.read().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(sink) = sink {
            sink.publish(&entry);
        }
    }

    /// Record an info entry
    pub fn info(&self, source: &str, message: impl fmt::Display) {
        self.add(LogLevel::Info, source, message);
    }

    /// Record a warning
    pub fn warn(&self, source: &str, message: impl fmt::Display) {
        self.add(LogLevel::Warn, source, message);
    }

    /// Record an error
    pub fn error(&self, source: &str, message: impl fmt::Display) {
        self.add(LogLevel::Error, source, message);
    }

    /// Record a debug entry
    pub fn debug(&self, source: &str, message: impl fmt::Display) {
        self.add(LogLevel::Debug, source, message);
    }

    /// Most recent `limit` entries, oldest first. `0` returns everything.
    #[must_use]
    pub fn entries(&self, limit: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let limit = if limit == 0 || limit > entries.len() {
            entries.len()
        } else {
            limit
        };
        entries.iter().skip(entries.len() - limit).cloned().collect()
    }

    /// Number of retained entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

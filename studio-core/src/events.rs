//! Operator-facing bot events: [`LogSink`] receives them, [`EventLog`] keeps the last [`LOG_CAPACITY`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ring::RingBuffer;

/// Number of log events kept by [`EventLog::new`].
pub const LOG_CAPACITY: usize = 50;

/// Event severity shown in the host console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    /// Single-character console marker.
    pub fn marker(&self) -> char {
        match self {
            Severity::Info => 'ℹ',
            Severity::Success => '✔',
            Severity::Error => '✖',
        }
    }
}

/// One event in the bot console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }

    /// `[HH:MM:SS] <marker> message`, as printed by the host console.
    pub fn display_line(&self) -> String {
        let time = self.created_at.with_timezone(&chrono::Local).format("%H:%M:%S");
        format!("[{}] {} {}", time, self.severity.marker(), self.message)
    }
}

/// Receiver for bot events (`onLog(message, severity)`).
pub trait LogSink: Send + Sync {
    fn emit(&self, message: &str, severity: Severity);
}

impl<F> LogSink for F
where
    F: Fn(&str, Severity) + Send + Sync,
{
    fn emit(&self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// Shared bounded event log. Every event is also forwarded to `tracing`.
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<Mutex<RingBuffer<LogEntry>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RingBuffer::new(capacity))),
        }
    }

    pub fn push(&self, message: impl Into<String>, severity: Severity) {
        let entry = LogEntry::new(message, severity);
        match severity {
            Severity::Error => tracing::error!(event = %entry.message, "bot event"),
            Severity::Success | Severity::Info => {
                tracing::info!(event = %entry.message, severity = ?severity, "bot event")
            }
        }
        let mut buf = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        buf.push(entry);
    }

    /// Snapshot, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        let buf = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        buf.iter_oldest_first().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for EventLog {
    fn emit(&self, message: &str, severity: Severity) {
        self.push(message, severity);
    }
}

//! The closed set of entry shapes produced by the query-logging pipeline.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Statistics for one normalized query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NormalizedEntry {
    pub action: String,

    /// Instant the upstream pipeline stamped on the entry.
    #[serde(rename = "@timestamp", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Accumulated execution time, in the producer's fine-grained unit.
    pub duration: f64,

    pub count: u64,

    /// The normalized query text. Carried for diagnostics only, never part
    /// of the emitted metrics.
    #[serde(default)]
    pub query: String,
}

/// Per-minute rollup statistics. `desc` names the rollup bucket and becomes
/// part of the metric namespace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerMinuteEntry {
    pub action: String,

    pub desc: String,

    #[serde(rename = "@timestamp", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,

    pub duration: f64,

    pub count: u64,
}

/// A decoded metric entry.
///
/// Every variant carries an action, an instant, a non-negative count and a
/// duration; those four fields are what the metric path consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Normalized(NormalizedEntry),
    PerMinute(PerMinuteEntry),
}

impl LogEntry {
    pub fn action(&self) -> &str {
        match self {
            LogEntry::Normalized(entry) => &entry.action,
            LogEntry::PerMinute(entry) => &entry.action,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Normalized(entry) => entry.timestamp,
            LogEntry::PerMinute(entry) => entry.timestamp,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            LogEntry::Normalized(entry) => entry.count,
            LogEntry::PerMinute(entry) => entry.count,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            LogEntry::Normalized(entry) => entry.duration,
            LogEntry::PerMinute(entry) => entry.duration,
        }
    }

    /// The entry instant as unix seconds, the resolution the collector
    /// expects.
    pub fn unix_seconds(&self) -> i64 {
        self.timestamp().timestamp()
    }
}

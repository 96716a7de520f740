//! The unit of emission: one named value at one instant.

use std::fmt;

/// A single metric sample in Carbon's model: dotted name, stringified
/// value, unix-seconds timestamp. Immutable once built and consumed exactly
/// once by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
    pub name: String,
    pub value: String,
    pub timestamp: i64,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// The plaintext protocol frame for this record, terminator included.
    pub fn plaintext(&self) -> String {
        format!("{} {} {}\n", self.name, self.value, self.timestamp)
    }
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.value, self.timestamp)
    }
}

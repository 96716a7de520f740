//! carbonizer-entry
//!
//! Typed decoding of the query-log wire format: one JSON object per line,
//! classified into the closed set of metric entry shapes the forwarder
//! understands.

pub mod decoder;
pub mod entry;

pub use decoder::{DecodeError, Decoded, Decoder};
pub use entry::{LogEntry, NormalizedEntry, PerMinuteEntry};

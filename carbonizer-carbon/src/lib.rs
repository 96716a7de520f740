//! carbonizer-carbon
//!
//! The metric sink capability: immutable metric records and the two sink
//! implementations the forwarder selects between at startup, a plaintext
//! Carbon TCP client and a no-op stand-in for dry runs.

pub mod record;
pub mod sink;

pub use record::MetricRecord;
pub use sink::{CarbonSink, MetricSink, NopSink, SinkError};

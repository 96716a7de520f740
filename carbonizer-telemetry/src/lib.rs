//! # Carbonizer Telemetry
//!
//! Logging setup and internal process counters for the forwarder.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;

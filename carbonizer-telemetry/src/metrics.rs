//! Internal counters describing the forwarder itself.
//!
//! These are process introspection, not the forwarded metrics: they answer
//! "is the forwarder keeping up and what is it dropping", and can be dumped
//! in text exposition format for debugging.

use prometheus::{Counter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub processed_lines: prometheus::Counter,
    pub decode_errors: prometheus::Counter,
    pub irrelevant_entries: prometheus::Counter,
    pub submit_errors: prometheus::Counter,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let processed_lines = Counter::new(
            "carbonizer_processed_lines_total",
            "Non-empty log lines handed to the muncher",
        )
        .unwrap();
        let decode_errors = Counter::new(
            "carbonizer_decode_errors_total",
            "Lines that failed to decode as a known entry shape",
        )
        .unwrap();
        let irrelevant_entries = Counter::new(
            "carbonizer_irrelevant_entries_total",
            "Well-formed lines with no handled action",
        )
        .unwrap();
        let submit_errors = Counter::new(
            "carbonizer_submit_errors_total",
            "Metric records that failed to reach the collector",
        )
        .unwrap();

        registry.register(Box::new(processed_lines.clone())).unwrap();
        registry.register(Box::new(decode_errors.clone())).unwrap();
        registry
            .register(Box::new(irrelevant_entries.clone()))
            .unwrap();
        registry.register(Box::new(submit_errors.clone())).unwrap();

        Self {
            registry,
            processed_lines,
            decode_errors,
            irrelevant_entries,
            submit_errors,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}

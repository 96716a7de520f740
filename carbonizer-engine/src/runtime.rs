//! Forwarder runtime: owns the tail session and the consumer loop.

use std::sync::Arc;

use tracing::{error, info};

use carbonizer_carbon::{CarbonSink, MetricSink, NopSink};
use carbonizer_config::CarbonizerConfig;
use carbonizer_tail::{LogTail, TailOptions};
use carbonizer_telemetry::MetricsRecorder;

use crate::error::EngineError;
use crate::muncher::{MunchError, MunchOutcome, Muncher};

/// Wires the configured sink and muncher to a tail session and drives the
/// single consumer loop. Constructed once at startup; there is no mutable
/// process-wide state behind it.
pub struct ForwarderRuntime {
    config: CarbonizerConfig,
    muncher: Muncher,
    metrics: MetricsRecorder,
}

impl ForwarderRuntime {
    /// Builds the runtime with the sink selected by `main.enabled`.
    pub fn new(config: CarbonizerConfig, metrics: MetricsRecorder) -> Self {
        let sink: Arc<dyn MetricSink> = if config.main.enabled {
            info!(
                host = %config.graphite.host,
                port = config.graphite.port,
                "sending to graphite/carbon enabled"
            );
            Arc::new(CarbonSink::new(&config.graphite.host, config.graphite.port))
        } else {
            info!("sending disabled, using nop sink");
            Arc::new(NopSink)
        };
        Self::with_sink(config, metrics, sink)
    }

    /// Builds the runtime around an explicit sink.
    pub fn with_sink(
        config: CarbonizerConfig,
        metrics: MetricsRecorder,
        sink: Arc<dyn MetricSink>,
    ) -> Self {
        let muncher = Muncher::new(sink, config.graphite.prefix.clone());
        Self {
            config,
            muncher,
            metrics,
        }
    }

    /// Attaches to the configured log file and runs until a shutdown
    /// signal, the configured line limit, or a fatal tail error.
    ///
    /// An unopenable log file fails here, before any line is processed.
    pub async fn run(&self) -> Result<(), EngineError> {
        let options = TailOptions {
            read_from: self.config.main.read_from,
            ..TailOptions::default()
        };
        let mut tail = LogTail::open(&self.config.main.input_log_file, options).await?;
        info!(path = %self.config.main.input_log_file.display(), "watching log file");

        tokio::select! {
            result = self.drain(&mut tail) => result,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("shutdown signal received");
                Ok(())
            }
        }
    }

    /// Drains the tail line by line, munching synchronously so metric
    /// emission order matches line order. Returns once `main.lines`
    /// non-empty lines were processed; with the limit at 0 it only returns
    /// on a fatal tail error.
    pub async fn drain(&self, tail: &mut LogTail) -> Result<(), EngineError> {
        let limit = self.config.main.lines;
        let mut processed: u64 = 0;

        loop {
            let line = tail.next_line().await?;
            self.metrics.processed_lines.inc();

            match self.muncher.munch(&line).await {
                Ok(MunchOutcome::Forwarded) => {}
                Ok(MunchOutcome::Skipped) => self.metrics.irrelevant_entries.inc(),
                Err(MunchError::Decode(e)) => {
                    error!(line = %line, error = %e, "skipping undecodable line");
                    self.metrics.decode_errors.inc();
                }
                Err(MunchError::Submit { errors }) => {
                    for e in &errors {
                        error!(line = %line, error = %e, "metric submission failed");
                    }
                    self.metrics.submit_errors.inc_by(errors.len() as f64);
                }
            }

            processed += 1;
            if limit > 0 && processed >= limit {
                info!(processed, "configured line limit reached, stopping");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use carbonizer_tail::ReadFrom;
    use std::time::Duration;
    use tokio::time::timeout;
    use tracing_test::traced_test;

    const WAIT: Duration = Duration::from_secs(5);

    const NORMALIZED_LINE: &str = r#"{"action":"PgNormalizedQueries","@timestamp":"2015-10-09T18:00:00+00:00","duration":115,"query":"select 1","count":1}"#;

    fn bounded_config(path: &std::path::Path, lines: u64) -> CarbonizerConfig {
        let mut config = CarbonizerConfig::default();
        config.main.input_log_file = path.to_path_buf();
        config.main.lines = lines;
        config.main.read_from = ReadFrom::Start;
        config.graphite.prefix = "xpto".into();
        config
    }

    fn test_tail_options() -> TailOptions {
        TailOptions {
            poll_interval: Duration::from_millis(10),
            ..TailOptions::default()
        }
    }

    #[tokio::test]
    async fn bounded_mode_processes_exactly_n_nonempty_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.log");
        let contents = format!("{NORMALIZED_LINE}\n\n\n{NORMALIZED_LINE}\n\n{NORMALIZED_LINE}\n");
        std::fs::write(&path, contents).unwrap();

        let sink = Arc::new(RecordingSink::new());
        let runtime = ForwarderRuntime::with_sink(
            bounded_config(&path, 2),
            MetricsRecorder::new(),
            sink.clone(),
        );

        let mut tail = LogTail::open(&path, test_tail_options()).await.unwrap();
        timeout(WAIT, runtime.drain(&mut tail))
            .await
            .expect("drain should stop at the line limit")
            .unwrap();

        // Two lines, two records each; the third line was never read.
        assert_eq!(sink.recorded().len(), 4);
    }

    #[traced_test]
    #[tokio::test]
    async fn per_line_failures_do_not_stop_the_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.log");
        let contents = format!(
            "this is not json\n{}\n{NORMALIZED_LINE}\n",
            r#"{"action":"PgSomethingElse","count":1}"#
        );
        std::fs::write(&path, contents).unwrap();

        let sink = Arc::new(RecordingSink::new());
        let metrics = MetricsRecorder::new();
        let runtime =
            ForwarderRuntime::with_sink(bounded_config(&path, 3), metrics.clone(), sink.clone());

        let mut tail = LogTail::open(&path, test_tail_options()).await.unwrap();
        timeout(WAIT, runtime.drain(&mut tail))
            .await
            .expect("drain should stop at the line limit")
            .unwrap();

        let records = sink.recorded();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "xpto.pgnormalizedqueries.count");
        assert_eq!(metrics.processed_lines.get(), 3.0);
        assert_eq!(metrics.decode_errors.get(), 1.0);
        assert_eq!(metrics.irrelevant_entries.get(), 1.0);
        assert!(logs_contain("skipping undecodable line"));
    }

    #[tokio::test]
    async fn submission_failures_are_counted_but_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queries.log");
        std::fs::write(&path, format!("{NORMALIZED_LINE}\n{NORMALIZED_LINE}\n")).unwrap();

        let sink = Arc::new(RecordingSink::failing_on(".count"));
        let metrics = MetricsRecorder::new();
        let runtime =
            ForwarderRuntime::with_sink(bounded_config(&path, 2), metrics.clone(), sink.clone());

        let mut tail = LogTail::open(&path, test_tail_options()).await.unwrap();
        timeout(WAIT, runtime.drain(&mut tail))
            .await
            .expect("drain should stop at the line limit")
            .unwrap();

        // Every duration record still made it out.
        assert_eq!(sink.recorded().len(), 2);
        assert_eq!(metrics.submit_errors.get(), 2.0);
    }
}

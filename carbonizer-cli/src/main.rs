//! ## pglog-carbonizer
//! **Query-log to graphite/carbon forwarder**
//!
//! Watches a query log for new entries and pushes the derived count and
//! duration metrics to a carbon collector. With the default
//! `read_from: start` a restart replays the whole file, so previously sent
//! metrics are emitted again unless something truncates the file first.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use carbonizer_config::{CarbonizerConfig, DEFAULT_CONFIG_FILE};
use carbonizer_engine::ForwarderRuntime;
use carbonizer_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    conf: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Fatal before the subscriber exists; the error surfaces on stderr
    // through the returned Result.
    let config = CarbonizerConfig::load_from_path(&cli.conf)?;
    EventLogger::init(&config.main.log_level);
    info!(config_file = %cli.conf.display(), "configuration loaded");

    let metrics = MetricsRecorder::new();
    let runtime = ForwarderRuntime::new(config, metrics);
    runtime.run().await?;

    info!("graceful shutdown");
    Ok(())
}

//! Structured logging with tracing.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber at the configured level. `RUST_LOG`
    /// still wins when set, so operators can crank verbosity without
    /// touching the config file.
    ///
    /// The level string is validated with the configuration; by the time
    /// it reaches here it names a real level.
    pub fn init(level: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .with_target(false)
            .init()
    }
}

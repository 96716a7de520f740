//! # Carbonizer Configuration
//!
//! Configuration loading for the forwarder: a YAML file merged with
//! `CARBONIZER_*` environment overrides on top of built-in defaults, then
//! validated before anything else starts. A bad configuration never gets
//! past startup.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod forwarder;
mod graphite;
mod validation;

pub use error::ConfigError;
pub use forwarder::ForwarderConfig;
pub use graphite::GraphiteConfig;
pub use validation::LOG_LEVELS;

/// Default configuration file path, next to the process working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pglog-carbonizer.conf";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct CarbonizerConfig {
    /// Forwarder process options.
    #[validate(nested)]
    pub main: ForwarderConfig,

    /// Metric collector endpoint and namespace.
    #[validate(nested)]
    pub graphite: GraphiteConfig,
}

impl CarbonizerConfig {
    /// Load configuration from a specific file.
    ///
    /// Hierarchy:
    /// 1. Built-in defaults
    /// 2. The YAML file at `path`
    /// 3. `CARBONIZER_*` environment variables
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(CarbonizerConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("CARBONIZER_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonizer_tail::ReadFrom;
    use std::io::Write;

    // Figment reads process-global environment variables; serialize the
    // tests that load so an env override cannot leak between them.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pglog-carbonizer.conf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn default_config_validates_except_input_file() {
        // The one field without a usable default is the watched file.
        let config = CarbonizerConfig::default();
        assert!(config.validate().is_err());

        let mut config = CarbonizerConfig::default();
        config.main.input_log_file = "/var/log/pglog.json".into();
        config.validate().expect("config should validate");
    }

    #[test]
    fn loads_yaml_file() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
main:
  enabled: true
  input_log_file: /var/log/pglog.json
  log_level: debug
  lines: 10
  read_from: end
graphite:
  host: carbon.internal
  port: 2004
  prefix: xpto
"#,
        );

        let config = CarbonizerConfig::load_from_path(&path).unwrap();
        assert!(config.main.enabled);
        assert_eq!(config.main.log_level, "debug");
        assert_eq!(config.main.lines, 10);
        assert_eq!(config.main.read_from, ReadFrom::End);
        assert_eq!(config.graphite.host, "carbon.internal");
        assert_eq!(config.graphite.port, 2004);
        assert_eq!(config.graphite.prefix, "xpto");
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
main:
  input_log_file: /var/log/pglog.json
"#,
        );

        let config = CarbonizerConfig::load_from_path(&path).unwrap();
        assert!(!config.main.enabled);
        assert_eq!(config.main.lines, 0);
        assert_eq!(config.main.read_from, ReadFrom::Start);
        assert_eq!(config.graphite.port, 2003);
        assert_eq!(config.graphite.prefix, "pglog");
    }

    #[test]
    fn environment_overrides_file() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
main:
  input_log_file: /var/log/pglog.json
graphite:
  prefix: from_file
"#,
        );

        std::env::set_var("CARBONIZER_GRAPHITE__PREFIX", "from_env");
        let config = CarbonizerConfig::load_from_path(&path).unwrap();
        std::env::remove_var("CARBONIZER_GRAPHITE__PREFIX");

        assert_eq!(config.graphite.prefix, "from_env");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let _env = env_guard();
        let (_dir, path) = write_config(
            r#"
main:
  input_log_file: /var/log/pglog.json
  log_level: loud
"#,
        );

        let result = CarbonizerConfig::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_missing_file() {
        let _env = env_guard();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.conf");
        let result = CarbonizerConfig::load_from_path(&missing);
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}

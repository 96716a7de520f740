//! Process-level forwarder options, the `main` section of the config file.

use std::path::PathBuf;

use carbonizer_tail::ReadFrom;
use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// The `main` section: what to watch and how to run.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ForwarderConfig {
    /// Enables actual sending; false selects the no-op sink.
    #[serde(default)]
    pub enabled: bool,

    /// The log file to watch and read.
    #[serde(default)]
    #[validate(custom(function = validation::validate_input_file))]
    pub input_log_file: PathBuf,

    /// Diagnostic verbosity.
    #[serde(default = "default_log_level")]
    #[validate(custom(function = validation::validate_log_level))]
    pub log_level: String,

    /// Stop after this many non-empty lines; 0 follows forever. Nonzero
    /// values are for diagnostic one-shot runs.
    #[serde(default)]
    pub lines: u64,

    /// Cursor position for a fresh session. `start` re-reads the whole
    /// file after a restart, which re-emits previously sent metrics; this
    /// is the documented behavior, not an accident.
    #[serde(default)]
    pub read_from: ReadFrom,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            input_log_file: PathBuf::new(),
            log_level: default_log_level(),
            lines: 0,
            read_from: ReadFrom::Start,
        }
    }
}

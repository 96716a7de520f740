//! Custom validation functions shared by the configuration sections.

use std::path::Path;
use validator::ValidationError;

/// Diagnostic verbosity levels understood by the logging setup.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate that a log level names one of the supported verbosities.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_log_level"))
    }
}

/// Validate that the watched file path was actually configured. Whether it
/// is openable is decided at startup, when the tail attaches.
pub fn validate_input_file(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        Err(ValidationError::new("missing_input_log_file"))
    } else {
        Ok(())
    }
}

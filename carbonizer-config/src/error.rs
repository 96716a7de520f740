//! Error types for configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type. Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// One or more fields failed validation.
    #[error("invalid configuration:\n{}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment could not parse or merge the sources.
    #[error("configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.field_errors() {
        let _ = writeln!(output, "field '{}':", field);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

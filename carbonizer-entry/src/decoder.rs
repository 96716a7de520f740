//! Classifies raw log lines into typed entries.
//!
//! Selection is keyed on the `action` field, trying the more specific
//! per-minute shape before the normalized one. Unknown fields are ignored
//! so newer producers keep decoding.

use serde_json::Value;
use thiserror::Error;

use crate::entry::{LogEntry, NormalizedEntry, PerMinuteEntry};

/// Action literal emitted for normalized per-query statistics.
pub const NORMALIZED_ACTION: &str = "PgNormalizedQueries";

/// Action literal emitted for the per-minute rollup.
pub const PER_MINUTE_ACTION: &str = "PgQueriesPerMinute";

/// Per-line decode failures. Always recoverable: the caller logs and moves
/// on to the next line.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line is not a JSON object: {0}")]
    Json(#[source] serde_json::Error),

    #[error("entry has no action field")]
    MissingAction,

    #[error("malformed {action} entry: {source}")]
    Shape {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of decoding one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// The line matched one of the handled shapes.
    Entry(LogEntry),
    /// Valid JSON carrying an action the forwarder does not handle. Not an
    /// error; there is simply nothing to do.
    Irrelevant,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes one non-empty line.
    ///
    /// Malformed JSON and handled actions with missing or mistyped fields
    /// are [`DecodeError`]s; unhandled actions are [`Decoded::Irrelevant`].
    pub fn decode(&self, line: &str) -> Result<Decoded, DecodeError> {
        let value: Value = serde_json::from_str(line).map_err(DecodeError::Json)?;

        let action = match value.get("action").and_then(Value::as_str) {
            Some(action) => action.to_owned(),
            None => return Err(DecodeError::MissingAction),
        };

        match action.as_str() {
            PER_MINUTE_ACTION => serde_json::from_value::<PerMinuteEntry>(value)
                .map(|entry| Decoded::Entry(LogEntry::PerMinute(entry)))
                .map_err(|source| DecodeError::Shape { action, source }),
            NORMALIZED_ACTION => serde_json::from_value::<NormalizedEntry>(value)
                .map(|entry| Decoded::Entry(LogEntry::Normalized(entry)))
                .map_err(|source| DecodeError::Shape { action, source }),
            _ => Ok(Decoded::Irrelevant),
        }
    }
}

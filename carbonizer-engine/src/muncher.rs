//! The per-line pipeline: decode, filter, build records, submit.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use carbonizer_carbon::{MetricRecord, MetricSink, SinkError};
use carbonizer_entry::{DecodeError, Decoded, Decoder};

use crate::keys::metric_key;

/// Per-line failures, surfaced to the drain loop. Neither variant stops
/// the stream.
#[derive(Debug, Error)]
pub enum MunchError {
    #[error("line could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    /// One or both record submissions failed. The pair is not atomic; a
    /// count can land while its duration does not.
    #[error("{} metric submission(s) failed", .errors.len())]
    Submit { errors: Vec<SinkError> },
}

/// What a successfully handled line amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MunchOutcome {
    /// Two records were built and submitted.
    Forwarded,
    /// The line was valid but carried nothing to forward.
    Skipped,
}

/// Turns one log line into zero, one or two sink submissions: a `.count`
/// and a `.duration` record under the entry's derived key.
pub struct Muncher {
    decoder: Decoder,
    sink: Arc<dyn MetricSink>,
    prefix: String,
}

impl Muncher {
    pub fn new(sink: Arc<dyn MetricSink>, prefix: impl Into<String>) -> Self {
        Self {
            decoder: Decoder::new(),
            sink,
            prefix: prefix.into(),
        }
    }

    pub async fn munch(&self, line: &str) -> Result<MunchOutcome, MunchError> {
        let entry = match self.decoder.decode(line)? {
            Decoded::Irrelevant => {
                debug!(line, "line carries no handled action");
                return Ok(MunchOutcome::Skipped);
            }
            Decoded::Entry(entry) => entry,
        };

        debug!(
            action = entry.action(),
            count = entry.count(),
            duration = entry.duration(),
            "decoded metric entry"
        );

        let key = metric_key(&entry, &self.prefix);
        let timestamp = entry.unix_seconds();
        let records = [
            MetricRecord::new(format!("{key}.count"), entry.count().to_string(), timestamp),
            MetricRecord::new(
                format!("{key}.duration"),
                entry.duration().to_string(),
                timestamp,
            ),
        ];

        // Each record gets its own attempt; a failed count must not
        // suppress the duration.
        let mut errors = Vec::new();
        for record in &records {
            if let Err(e) = self.sink.submit(record).await {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(MunchOutcome::Forwarded)
        } else {
            Err(MunchError::Submit { errors })
        }
    }
}

use thiserror::Error;

use carbonizer_tail::TailError;

/// Fatal runtime failures. Anything per-line stays inside the drain loop;
/// what escapes here terminates the process.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("log tail failure: {0}")]
    Tail(#[from] TailError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

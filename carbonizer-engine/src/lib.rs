//! # Carbonizer Engine
//!
//! The forwarding pipeline: a tail session feeding the per-line muncher,
//! which turns decoded entries into metric records and pushes them at the
//! configured sink. One sequential consumer per watched file; per-line
//! failures are logged and never stop the stream.

mod error;
mod keys;
mod muncher;
mod runtime;

pub use error::EngineError;
pub use keys::metric_key;
pub use muncher::{MunchError, MunchOutcome, Muncher};
pub use runtime::ForwarderRuntime;

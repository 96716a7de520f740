//! carbonizer-tail
//!
//! Provides the file-following side of the forwarder: a tail that follows
//! appends to a growing log file and survives external rotation.

pub mod tail;

pub use tail::{LogTail, ReadFrom, TailError, TailOptions};

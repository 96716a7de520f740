//! Sink implementations for the plaintext Carbon push protocol.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::record::MetricRecord;

/// Submission failures. One record gets exactly one attempt; any retry
/// policy lives with the operator, not here.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not connect to carbon at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write metric to carbon: {0}")]
    Write(#[source] std::io::Error),
}

/// Capability to deliver one metric record. Implementations report
/// per-record success or failure and own their connection handling.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn submit(&self, record: &MetricRecord) -> Result<(), SinkError>;
}

/// Pushes records to a Carbon endpoint over a cached TCP connection.
///
/// The connection is dialed lazily on first use and dropped after a failed
/// write, so the next submission redials instead of reusing a dead socket.
pub struct CarbonSink {
    addr: String,
    conn: Mutex<Option<TcpStream>>,
}

impl CarbonSink {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            conn: Mutex::new(None),
        }
    }
}

#[async_trait]
impl MetricSink for CarbonSink {
    async fn submit(&self, record: &MetricRecord) -> Result<(), SinkError> {
        let mut conn = self.conn.lock().await;

        let mut stream = match conn.take() {
            Some(stream) => stream,
            None => {
                debug!(addr = %self.addr, "connecting to carbon");
                TcpStream::connect(&self.addr)
                    .await
                    .map_err(|source| SinkError::Connect {
                        addr: self.addr.clone(),
                        source,
                    })?
            }
        };

        match stream.write_all(record.plaintext().as_bytes()).await {
            Ok(()) => {
                trace!(metric = %record, "metric pushed to carbon");
                *conn = Some(stream);
                Ok(())
            }
            Err(source) => {
                // Connection stays dropped; the next submission redials.
                warn!(addr = %self.addr, "carbon connection failed, dropping it");
                Err(SinkError::Write(source))
            }
        }
    }
}

/// Accepts every record without any I/O. Selected when sending is disabled,
/// and handy as a dry-run stand-in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopSink;

#[async_trait]
impl MetricSink for NopSink {
    async fn submit(&self, record: &MetricRecord) -> Result<(), SinkError> {
        trace!(metric = %record, "nop sink accepted metric");
        Ok(())
    }
}

//! Follows a log file the way `tail -F` does: yield appended lines as they
//! are written, and transparently reattach when the file is rotated or
//! truncated underneath us.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::time::sleep;
use tracing::{debug, info};

/// Errors produced while opening or following the watched file.
#[derive(Debug, Error)]
pub enum TailError {
    /// The watched file could not be opened at startup.
    #[error("could not open watched file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while following an already opened file.
    #[error("I/O error while following watched file: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a fresh tail session places its read cursor.
///
/// There is no persisted offset: `Start` re-reads the whole file on every
/// process start, `End` only yields lines appended after attach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFrom {
    #[default]
    Start,
    End,
}

/// Tuning knobs for a tail session.
#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Initial cursor position for the session.
    pub read_from: ReadFrom,
    /// How long to sleep when the file has no new data.
    pub poll_interval: Duration,
}

impl Default for TailOptions {
    fn default() -> Self {
        Self {
            read_from: ReadFrom::Start,
            poll_interval: Duration::from_millis(250),
        }
    }
}

#[cfg(unix)]
fn file_identity(metadata: &std::fs::Metadata) -> (u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.dev(), metadata.ino())
}

#[cfg(not(unix))]
fn file_identity(_metadata: &std::fs::Metadata) -> (u64, u64) {
    // No stable identity available; truncation detection still applies.
    (0, 0)
}

/// A live tail session over one log file.
///
/// Owns the open handle and the read cursor. Lines are yielded in the byte
/// order they were appended, one per terminator, with empty lines filtered
/// out. Suspends on the poll interval when no data is available instead of
/// spinning.
pub struct LogTail {
    path: PathBuf,
    options: TailOptions,
    reader: BufReader<File>,
    identity: (u64, u64),
    position: u64,
    pending: String,
}

impl LogTail {
    /// Attaches to `path`. An unopenable path is a fatal startup condition
    /// for the forwarder, so the error carries the path for the exit log.
    pub async fn open(path: impl AsRef<Path>, options: TailOptions) -> Result<Self, TailError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|source| TailError::Open {
            path: path.clone(),
            source,
        })?;
        let metadata = file.metadata().await?;
        let identity = file_identity(&metadata);

        let mut reader = BufReader::new(file);
        let position = match options.read_from {
            ReadFrom::Start => 0,
            ReadFrom::End => reader.seek(SeekFrom::End(0)).await?,
        };

        debug!(path = %path.display(), position, "attached to log file");
        Ok(Self {
            path,
            options,
            reader,
            identity,
            position,
            pending: String::new(),
        })
    }

    /// Yields the next non-empty line, waiting for new data as needed.
    ///
    /// Never returns end-of-stream on its own: at end of file the tail
    /// checks for rotation and then suspends until more data shows up.
    pub async fn next_line(&mut self) -> Result<String, TailError> {
        loop {
            let mut buf = String::new();
            let read = self.reader.read_line(&mut buf).await?;

            if read == 0 {
                if self.check_rotation().await? {
                    continue;
                }
                sleep(self.options.poll_interval).await;
                continue;
            }

            self.position += read as u64;

            if !buf.ends_with('\n') {
                // Terminator not written yet; stash the fragment until the
                // writer finishes the line.
                self.pending.push_str(&buf);
                continue;
            }

            let mut line = std::mem::take(&mut self.pending);
            line.push_str(&buf);
            if line.ends_with('\n') {
                line.pop();
            }
            if line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                continue;
            }
            return Ok(line);
        }
    }

    /// Re-stats the path after hitting end of file. Returns true when the
    /// session reattached to a rotated or truncated file.
    async fn check_rotation(&mut self) -> Result<bool, TailError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "watched file is gone, waiting for recreation");
                return Ok(false);
            }
            Err(e) => return Err(TailError::Io(e)),
        };

        if file_identity(&metadata) != self.identity {
            info!(path = %self.path.display(), "watched file was rotated, reopening");
            return self.reopen().await;
        }

        if metadata.len() < self.position {
            info!(path = %self.path.display(), "watched file was truncated, rereading");
            return self.reopen().await;
        }

        Ok(false)
    }

    /// Reattaches to the path from the start of the (new) file. A file that
    /// vanished between the stat and the open is not an error; the next
    /// poll cycle retries.
    async fn reopen(&mut self) -> Result<bool, TailError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(TailError::Io(e)),
        };
        let metadata = file.metadata().await?;

        self.identity = file_identity(&metadata);
        self.reader = BufReader::new(file);
        self.position = 0;
        self.pending.clear();
        Ok(true)
    }
}

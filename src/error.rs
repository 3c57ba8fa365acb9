//! Error type shared by the sync pipeline.
//!
//! Only the "hard" failures live here: manifest and declaration file access,
//! revision lookup, and configuration loading. External command failures are
//! never errors; they are recorded as task outcomes instead.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Hard failure that aborts a sync run.
#[derive(Debug)]
pub enum SyncError {
    /// Reading or writing a file failed for a reason other than absence.
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A required file does not exist.
    NotFound {
        /// File that was expected.
        path: PathBuf,
    },
    /// A file was not valid JSON.
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A file parsed but did not have the expected structure.
    Shape {
        /// File with the unexpected structure.
        path: PathBuf,
        /// Human readable description of what was wrong.
        detail: String,
    },
    /// Transport-level HTTP failure.
    Http(reqwest::Error),
    /// HTTP request completed with a non-success status.
    Status {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },
    /// The commit listing came back empty.
    EmptyHistory {
        /// `owner/repo` that was queried.
        repository: String,
    },
    /// Blocking file work moved off the async runtime panicked or was cancelled.
    Task(String),
    /// Configuration file could not be loaded.
    Config {
        /// Offending configuration file.
        path: PathBuf,
        /// What went wrong.
        detail: String,
    },
}

impl SyncError {
    /// What: Classify an I/O error raised while reading `path`.
    ///
    /// Inputs:
    /// - `path`: File being read.
    /// - `err`: Error returned by the read.
    ///
    /// Output:
    /// - `NotFound` for missing files, `Io` for everything else.
    pub(crate) fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source: err }
        }
    }
}

/// What: Run blocking file work on tokio's blocking pool.
///
/// Inputs:
/// - `work`: Closure doing synchronous I/O.
///
/// Output:
/// - The closure's own result.
///
/// # Errors
/// - Whatever `work` returns, or `Task` when the blocking task panicked or was cancelled.
pub(crate) async fn off_runtime<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SyncError::Task(format!("spawn failed: {e}")))?
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::NotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "{} is not valid JSON: {source}", path.display())
            }
            Self::Shape { path, detail } => {
                write!(f, "unexpected structure in {}: {detail}", path.display())
            }
            Self::Http(err) => write!(f, "HTTP request failed: {err}"),
            Self::Status { url, status } => write!(f, "{url} returned HTTP status {status}"),
            Self::EmptyHistory { repository } => {
                write!(f, "no commits returned for {repository}")
            }
            Self::Task(detail) => write!(f, "background task failed: {detail}"),
            Self::Config { path, detail } => {
                write!(f, "invalid configuration in {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Http(err) => Some(err),
            Self::NotFound { .. }
            | Self::Shape { .. }
            | Self::Status { .. }
            | Self::EmptyHistory { .. }
            | Self::Task(_)
            | Self::Config { .. } => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the git runner. Never returned from `pull`/`push`, which
/// report outcomes instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error("git {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("could not initialise repository at '{path}': {reason}")]
    Init { path: PathBuf, reason: String },
}

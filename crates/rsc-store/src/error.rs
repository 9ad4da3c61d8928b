//! Storage error types for rsc-store.

use std::io;
use std::path::{Path, PathBuf};

use rsc_core::CoreError;
use thiserror::Error;

/// Errors from local persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem write denied or path missing.
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing store is held open by another process or writer.
    /// Retriable once the other holder lets go.
    #[error("'{path}' is in use by another program; close it and try again")]
    Locked { path: PathBuf },

    /// The workbook exists but cannot be parsed.
    #[error("record store '{path}' is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The workbook could not be encoded, e.g. a sheet name Excel rejects.
    #[error("cannot write record store '{path}': {reason}")]
    Encode { path: PathBuf, reason: String },

    /// A sheet lacks a column the caller depends on.
    #[error("sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: &'static str },

    /// The admission number already has a record in this class.
    #[error("admission number '{admission_no}' has already submitted for {class}")]
    DuplicateSubmission { class: String, admission_no: String },

    /// No artifact matched the derived name.
    #[error("no artifact named '{stem}.*' in {class}")]
    NotFound { class: String, stem: String },

    /// CSV read or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Domain validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Plain I/O failure at `path`.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// I/O failure on the shared workbook: permission denial means another
    /// program holds the file, which is reported as `Locked`.
    pub(crate) fn workbook_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::Locked {
                path: path.to_path_buf(),
            }
        } else {
            Self::io(path, source)
        }
    }

    /// Whether the user can fix this by closing another program and retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_on_workbook_is_locked() {
        let err = StoreError::workbook_io(
            Path::new("Project_Results.xlsx"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, StoreError::Locked { .. }));
        assert!(err.is_retriable());
    }

    #[test]
    fn other_workbook_errors_stay_io() {
        let err = StoreError::workbook_io(
            Path::new("Project_Results.xlsx"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!err.is_retriable());
    }
}

//! Artifact naming contract.
//!
//! An uploaded artifact lives at
//! `{results}/{class}/{Name_With_Underscores}_{AdmissionNo}.{ext}`.
//! The record table stores no path; lookups re-derive the same stem from the
//! record's name and admission number, so `store` and `find` must agree on
//! this normalization exactly.
//!
//! Admission numbers such as `RSC/2026/001` contain `/`, which nests the
//! artifact under intermediate directories. Each path segment is checked so
//! that no segment is empty, `.` or `..`.

use std::path::PathBuf;

use crate::errors::CoreError;

/// Replace spaces with underscores, the only normalization applied to names.
#[must_use]
pub fn sanitize_name(full_name: &str) -> String {
    full_name.replace(' ', "_")
}

/// Extension of an uploaded file name: everything after the last `.`.
///
/// Returns `None` when the name has no `.` or ends with one.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<&str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['/', '\\']) {
        None
    } else {
        Some(ext)
    }
}

/// Derived artifact stem for one (name, admission number) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    stem: String,
}

impl ArtifactName {
    /// Build the stem `{sanitized name}_{admission_no}`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if either part is blank or the stem
    /// contains a path segment that could escape the class directory.
    pub fn new(full_name: &str, admission_no: &str) -> Result<Self, CoreError> {
        if full_name.trim().is_empty() {
            return Err(CoreError::Validation("full name is empty".into()));
        }
        if admission_no.trim().is_empty() {
            return Err(CoreError::Validation("admission number is empty".into()));
        }

        let stem = format!("{}_{admission_no}", sanitize_name(full_name));
        if stem.contains('\\') {
            return Err(CoreError::Validation(format!(
                "artifact name '{stem}' must not contain '\\'"
            )));
        }
        for segment in stem.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(CoreError::Validation(format!(
                    "artifact name '{stem}' has an invalid path segment"
                )));
            }
        }
        Ok(Self { stem })
    }

    /// The stem without extension, e.g. `Ada_Lovelace_RSC/2026/001`.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Path relative to the class directory for the given extension.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty extension or one that
    /// contains a path separator.
    pub fn relative_path(&self, extension: &str) -> Result<PathBuf, CoreError> {
        let ext = extension.trim().trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\', '.']) {
            return Err(CoreError::Validation(format!(
                "invalid artifact extension '{extension}'"
            )));
        }
        let mut path: PathBuf = self.stem.split('/').collect();
        path.set_file_name(format!("{}.{ext}", self.file_prefix()));
        Ok(path)
    }

    /// Directory part of the stem relative to the class directory
    /// (empty when the admission number has no `/`).
    #[must_use]
    pub fn parent_segments(&self) -> PathBuf {
        let mut segments: Vec<&str> = self.stem.split('/').collect();
        segments.pop();
        segments.into_iter().collect()
    }

    /// Final segment of the stem; the artifact file name starts with this
    /// followed by `.`.
    #[must_use]
    pub fn file_prefix(&self) -> &str {
        self.stem.rsplit('/').next().unwrap_or(&self.stem)
    }

    /// Whether `file_name` is this artifact with some non-empty extension.
    #[must_use]
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.file_prefix())
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
    }
}

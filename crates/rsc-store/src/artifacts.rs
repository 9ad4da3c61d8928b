//! Artifact store: uploaded files under `{results}/{class}/`.
//!
//! Names follow [`rsc_core::ArtifactName`]; `find` re-derives the same stem
//! and matches any extension, so callers never need to know what was
//! uploaded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rsc_core::{ArtifactName, ClassId};

use crate::error::StoreError;

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root of the results tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a class's artifacts.
    #[must_use]
    pub fn class_dir(&self, class: &ClassId) -> PathBuf {
        self.root.join(class.as_str())
    }

    /// Path an artifact would be stored at.
    ///
    /// # Errors
    ///
    /// `Core` for invalid names or extensions.
    pub fn path_for(
        &self,
        class: &ClassId,
        full_name: &str,
        admission_no: &str,
        extension: &str,
    ) -> Result<PathBuf, StoreError> {
        let name = ArtifactName::new(full_name, admission_no)?;
        Ok(self.class_dir(class).join(name.relative_path(extension)?))
    }

    /// Write an artifact and return its path. Creates the class directory
    /// (and any directories implied by `/` in the admission number).
    ///
    /// Existing files are overwritten; duplicate prevention is the guard's job.
    ///
    /// # Errors
    ///
    /// `Core` for invalid names or extensions, `Io` when the write is denied.
    pub fn store(
        &self,
        class: &ClassId,
        full_name: &str,
        admission_no: &str,
        bytes: &[u8],
        extension: &str,
    ) -> Result<PathBuf, StoreError> {
        let path = self.path_for(class, full_name, admission_no, extension)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!(class = %class, path = %path.display(), bytes = bytes.len(), "artifact stored");
        Ok(path)
    }

    /// Locate the artifact for a (name, admission number) pair, whatever its
    /// extension. When several files match, the lexicographically first wins.
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing matches, `Core` for invalid names, `Io` when
    /// the directory cannot be listed.
    pub fn find(
        &self,
        class: &ClassId,
        full_name: &str,
        admission_no: &str,
    ) -> Result<PathBuf, StoreError> {
        let name = ArtifactName::new(full_name, admission_no)?;
        let dir = self.class_dir(class).join(name.parent_segments());
        let not_found = || StoreError::NotFound {
            class: class.to_string(),
            stem: name.stem().to_string(),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            let is_match = entry
                .file_name()
                .to_str()
                .is_some_and(|file_name| name.matches_file_name(file_name));
            if is_match && path.is_file() {
                matches.push(path);
            }
        }
        matches.sort();
        if matches.len() > 1 {
            tracing::debug!(stem = name.stem(), count = matches.len(), "multiple artifacts match; using first");
        }
        matches.into_iter().next().ok_or_else(not_found)
    }

    /// Read an artifact's bytes.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read.
    pub fn read(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        fs::read(path).map_err(|e| StoreError::io(path, e))
    }

    /// Best-effort removal, used to roll back an artifact whose record
    /// could not be written.
    pub fn discard(&self, path: &Path) {
        if let Err(error) = fs::remove_file(path) {
            tracing::warn!(%error, path = %path.display(), "failed to discard artifact");
        }
    }
}

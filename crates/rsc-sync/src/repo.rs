use std::path::Path;

use crate::error::SyncError;

/// Whether `root` is itself the work tree of a git repository.
///
/// Deliberately not `discover`: a portal root nested inside some other
/// checkout must not commit into the outer repository.
#[must_use]
pub fn is_repository(root: &Path) -> bool {
    gix::open(root).is_ok_and(|repo| repo.work_dir().is_some())
}

/// Open the repository at `root`, initialising one if absent.
///
/// # Errors
///
/// Returns `SyncError::Init` when the repository cannot be created.
pub fn open_or_init(root: &Path) -> Result<(), SyncError> {
    if is_repository(root) {
        return Ok(());
    }
    gix::init(root).map_err(|e| SyncError::Init {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::info!(root = %root.display(), "initialised local repository");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_a_repository_once() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_repository(dir.path()));

        open_or_init(dir.path()).unwrap();
        assert!(is_repository(dir.path()));
        assert!(dir.path().join(".git").is_dir());

        // Second call is a no-op.
        open_or_init(dir.path()).unwrap();
        assert!(is_repository(dir.path()));
    }

    #[test]
    fn nested_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        open_or_init(dir.path()).unwrap();
        let nested = dir.path().join("portal");
        std::fs::create_dir(&nested).unwrap();
        assert!(!is_repository(&nested));
    }
}

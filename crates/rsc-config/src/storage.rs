//! Local storage layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_workbook() -> String {
    "Project_Results.xlsx".to_string()
}

fn default_results_dir() -> String {
    "Results".to_string()
}

fn default_audit_log() -> String {
    "security_audit.csv".to_string()
}

fn default_lock_file() -> String {
    ".rsc/store.write.lock".to_string()
}

const fn default_lock_timeout_secs() -> u64 {
    10
}

/// File names are relative to the portal root unless absolute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Record workbook holding one sheet per class section.
    #[serde(default = "default_workbook")]
    pub workbook: String,

    /// Root of the artifact tree (one subdirectory per class).
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    /// Append-only CSV audit ledger.
    #[serde(default = "default_audit_log")]
    pub audit_log: String,

    /// Cross-process write lock guarding the workbook.
    #[serde(default = "default_lock_file")]
    pub lock_file: String,

    /// How long a writer waits for the lock before reporting the store as locked.
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            results_dir: default_results_dir(),
            audit_log: default_audit_log(),
            lock_file: default_lock_file(),
            lock_timeout_secs: default_lock_timeout_secs(),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn workbook_path(&self, root: &Path) -> PathBuf {
        root.join(&self.workbook)
    }

    #[must_use]
    pub fn results_path(&self, root: &Path) -> PathBuf {
        root.join(&self.results_dir)
    }

    #[must_use]
    pub fn audit_log_path(&self, root: &Path) -> PathBuf {
        root.join(&self.audit_log)
    }

    #[must_use]
    pub fn lock_path(&self, root: &Path) -> PathBuf {
        root.join(&self.lock_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_layout() {
        let config = StorageConfig::default();
        assert_eq!(config.results_dir, "Results");
        assert_eq!(config.audit_log, "security_audit.csv");
        assert_eq!(config.lock_timeout_secs, 10);
    }

    #[test]
    fn relative_paths_resolve_under_root() {
        let config = StorageConfig::default();
        let root = Path::new("/srv/portal");
        assert_eq!(
            config.results_path(root),
            PathBuf::from("/srv/portal/Results")
        );
        assert_eq!(
            config.workbook_path(root),
            PathBuf::from("/srv/portal/Project_Results.xlsx")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let config = StorageConfig {
            audit_log: "/var/log/rsc/audit.csv".into(),
            ..Default::default()
        };
        assert_eq!(
            config.audit_log_path(Path::new("/srv/portal")),
            PathBuf::from("/var/log/rsc/audit.csv")
        );
    }
}

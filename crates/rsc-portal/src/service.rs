//! The portal service.
//!
//! `Portal` owns every local store plus the sync coordinator for one portal
//! root. Operations are split across modules as `impl Portal` blocks:
//! submission and import in `submit`, staff views in `staff`, previews in
//! `preview`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rsc_config::{CredentialProvider, PortalConfig};
use rsc_store::write_lock::{self, WriteLockGuard};
use rsc_store::{ArtifactStore, AuditLog, RecordTable};
use rsc_sync::{PullOutcome, PushOutcome, SyncCoordinator, SyncSettings};
use tokio::sync::MutexGuard;

use crate::error::PortalError;
use crate::staff::AccessSession;

pub struct Portal {
    pub(crate) root: PathBuf,
    pub(crate) config: PortalConfig,
    pub(crate) records: RecordTable,
    pub(crate) artifacts: ArtifactStore,
    pub(crate) audit: Arc<AuditLog>,
    pub(crate) sync: SyncCoordinator,
    pub(crate) access: Mutex<AccessSession>,
    write_mutex: tokio::sync::Mutex<()>,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

/// Held across a read-modify-write of the record store: the in-process
/// mutex plus the cross-process lock file.
pub(crate) struct WriteSpan<'a> {
    _local: MutexGuard<'a, ()>,
    _file: WriteLockGuard,
}

impl Portal {
    /// Open a portal rooted at `root`. Nothing is read or created until the
    /// first operation.
    #[must_use]
    pub fn open(
        root: &Path,
        config: PortalConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let storage = &config.storage;
        let audit = Arc::new(AuditLog::new(storage.audit_log_path(root)));
        let sync = SyncCoordinator::new(
            root,
            SyncSettings::from(&config.remote),
            credentials,
            audit.clone(),
        );

        Self {
            root: root.to_path_buf(),
            records: RecordTable::new(storage.workbook_path(root)),
            artifacts: ArtifactStore::new(storage.results_path(root)),
            lock_path: storage.lock_path(root),
            lock_timeout: Duration::from_secs(storage.lock_timeout_secs),
            audit,
            sync,
            access: Mutex::new(AccessSession::default()),
            write_mutex: tokio::sync::Mutex::new(()),
            config,
        }
    }

    /// Open using the loaded configuration's own remote settings as the
    /// credential provider.
    #[must_use]
    pub fn from_config(root: &Path, config: PortalConfig) -> Self {
        let credentials = Arc::new(config.remote.clone());
        Self::open(root, config, credentials)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn config(&self) -> &PortalConfig {
        &self.config
    }

    #[must_use]
    pub const fn records(&self) -> &RecordTable {
        &self.records
    }

    #[must_use]
    pub const fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    #[must_use]
    pub const fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }

    /// Run the once-per-process startup pull if it has not run yet.
    pub async fn activate(&self) -> Option<PullOutcome> {
        self.sync.ensure_pulled().await
    }

    pub async fn pull(&self) -> PullOutcome {
        self.sync.pull().await
    }

    pub async fn push(&self) -> PushOutcome {
        self.sync.push().await
    }

    pub(crate) async fn begin_write(&self) -> Result<WriteSpan<'_>, PortalError> {
        let local = self.write_mutex.lock().await;
        let file = write_lock::acquire(&self.lock_path, self.lock_timeout).await?;
        Ok(WriteSpan {
            _local: local,
            _file: file,
        })
    }
}

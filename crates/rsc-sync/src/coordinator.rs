//! Sync coordinator: pull once per process, push after every write.
//!
//! Neither `pull` nor `push` ever fails the caller. Missing credentials mean
//! local-only mode and yield `Skipped`; everything else that goes wrong is
//! redacted, written to the audit ledger and reported as `Failed`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rsc_config::{CredentialProvider, RemoteConfig};
use rsc_core::entities::now_timestamp;
use rsc_core::{AuditEventKind, AuditSink};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::SyncError;
use crate::git::GitRunner;
use crate::repo;

/// Portal-local state never leaves the machine: the `.rsc` directory
/// (config, lock file) and dotenv files, which may carry the remote token.
const LOCAL_STATE_EXCLUDES: &[&str] = &[
    ":(exclude).rsc",
    ":(exclude,glob)**/.env",
    ":(exclude,glob)**/.env.*",
];

/// Commit identity and transport limits for sync operations.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub branch: String,
    pub author_name: String,
    pub author_email: String,
    pub timeout: Duration,
}

impl From<&RemoteConfig> for SyncSettings {
    fn from(remote: &RemoteConfig) -> Self {
        Self {
            branch: remote.branch.clone(),
            author_name: remote.author_name.clone(),
            author_email: remote.author_email.clone(),
            timeout: Duration::from_secs(remote.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingCredential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PullOutcome {
    Skipped { reason: SkipReason },
    /// No local repository to integrate into.
    NoRepository,
    Pulled,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PushOutcome {
    Skipped { reason: SkipReason },
    /// Nothing new to commit; the branch was (re)pushed as is.
    UpToDate,
    Pushed { commit: String },
    Failed { message: String },
}

impl PushOutcome {
    /// Whether the remote now holds local state.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::UpToDate | Self::Pushed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Uninitialized,
    Pulled,
    Pushed,
    PushFailed,
}

#[derive(Debug)]
struct SyncState {
    phase: SyncPhase,
    last_pull: Option<PullOutcome>,
}

pub struct SyncCoordinator {
    root: PathBuf,
    settings: SyncSettings,
    credentials: Arc<dyn CredentialProvider>,
    audit: Arc<dyn AuditSink>,
    git: GitRunner,
    state: Mutex<SyncState>,
    push_lock: Mutex<()>,
}

impl SyncCoordinator {
    #[must_use]
    pub fn new(
        root: &Path,
        settings: SyncSettings,
        credentials: Arc<dyn CredentialProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let git = GitRunner::new(root, settings.timeout, Arc::clone(&credentials));
        Self {
            root: root.to_path_buf(),
            settings,
            credentials,
            audit,
            git,
            state: Mutex::new(SyncState {
                phase: SyncPhase::Uninitialized,
                last_pull: None,
            }),
            push_lock: Mutex::new(()),
        }
    }

    pub async fn phase(&self) -> SyncPhase {
        self.state.lock().await.phase
    }

    /// Outcome of the startup pull, once it has run.
    pub async fn last_pull(&self) -> Option<PullOutcome> {
        self.state.lock().await.last_pull.clone()
    }

    /// Run the startup pull if this is the first activation. Returns the
    /// outcome when a pull ran, `None` when it had already been attempted.
    ///
    /// Concurrent first callers wait for the one pull in progress.
    pub async fn ensure_pulled(&self) -> Option<PullOutcome> {
        let mut state = self.state.lock().await;
        if state.phase != SyncPhase::Uninitialized {
            return None;
        }
        let outcome = self.pull_inner().await;
        state.phase = SyncPhase::Pulled;
        state.last_pull = Some(outcome.clone());
        Some(outcome)
    }

    /// Fetch and integrate the remote branch into the local repository.
    pub async fn pull(&self) -> PullOutcome {
        let outcome = self.pull_inner().await;
        let mut state = self.state.lock().await;
        if state.phase == SyncPhase::Uninitialized {
            state.phase = SyncPhase::Pulled;
        }
        state.last_pull = Some(outcome.clone());
        outcome
    }

    /// Stage everything, commit if anything changed, push to the remote.
    ///
    /// Pushes are serialised: a push started after a write waits for any
    /// earlier push, so state from a later write never lands first.
    pub async fn push(&self) -> PushOutcome {
        let _serial = self.push_lock.lock().await;

        let Some(endpoint) = self.endpoint() else {
            tracing::debug!("push skipped: no remote credential");
            return PushOutcome::Skipped {
                reason: SkipReason::MissingCredential,
            };
        };

        let outcome = match self.push_inner(&endpoint).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let message = self.git.redact(&error.to_string());
                tracing::warn!(%message, "push failed");
                self.audit.record(AuditEventKind::SyncError, &message);
                PushOutcome::Failed { message }
            }
        };

        self.state.lock().await.phase = if outcome.succeeded() {
            SyncPhase::Pushed
        } else {
            SyncPhase::PushFailed
        };
        outcome
    }

    async fn pull_inner(&self) -> PullOutcome {
        let Some(endpoint) = self.endpoint() else {
            tracing::debug!("pull skipped: no remote credential");
            return PullOutcome::Skipped {
                reason: SkipReason::MissingCredential,
            };
        };
        if !repo::is_repository(&self.root) {
            tracing::info!(root = %self.root.display(), "pull skipped: no local repository");
            return PullOutcome::NoRepository;
        }

        let name = self.identity_name();
        let email = self.identity_email();
        let args = [
            "-c",
            name.as_str(),
            "-c",
            email.as_str(),
            "pull",
            "--no-rebase",
            "--no-edit",
            endpoint.as_str(),
            self.settings.branch.as_str(),
        ];
        match self.git.run(&args).await {
            Ok(_) => {
                tracing::info!(branch = %self.settings.branch, "pulled remote state");
                PullOutcome::Pulled
            }
            Err(error) => {
                let message = self.git.redact(&error.to_string());
                tracing::warn!(%message, "pull failed");
                self.audit.record(AuditEventKind::PullError, &message);
                PullOutcome::Failed { message }
            }
        }
    }

    async fn push_inner(&self, endpoint: &str) -> Result<PushOutcome, SyncError> {
        repo::open_or_init(&self.root)?;

        let mut add = vec!["add", "--all", "--", "."];
        add.extend_from_slice(LOCAL_STATE_EXCLUDES);
        self.git.run(&add).await?;
        let has_changes = !self.git.probe(&["diff", "--cached", "--quiet"]).await?;

        let committed = if has_changes {
            let message = format!("New Submission Synced: {}", now_timestamp());
            let name = self.identity_name();
            let email = self.identity_email();
            self.git
                .run(&[
                    "-c",
                    name.as_str(),
                    "-c",
                    email.as_str(),
                    "commit",
                    "--quiet",
                    "-m",
                    message.as_str(),
                ])
                .await?;
            Some(self.git.run(&["rev-parse", "HEAD"]).await?)
        } else {
            None
        };

        let has_head = self
            .git
            .probe(&["rev-parse", "--verify", "--quiet", "HEAD"])
            .await?;
        if !has_head {
            // Empty repository with nothing staged: nothing exists to push.
            return Ok(PushOutcome::UpToDate);
        }

        let refspec = format!("HEAD:refs/heads/{}", self.settings.branch);
        self.git
            .run(&["push", "--quiet", endpoint, refspec.as_str()])
            .await?;

        Ok(match committed {
            Some(commit) => {
                tracing::info!(%commit, branch = %self.settings.branch, "pushed local state");
                PushOutcome::Pushed { commit }
            }
            None => PushOutcome::UpToDate,
        })
    }

    fn endpoint(&self) -> Option<String> {
        if !self.credentials.has_remote_credential() {
            return None;
        }
        self.credentials.remote_endpoint()
    }

    fn identity_name(&self) -> String {
        format!("user.name={}", self.settings.author_name)
    }

    fn identity_email(&self) -> String {
        format!("user.email={}", self.settings.author_email)
    }
}

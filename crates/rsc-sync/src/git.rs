//! Bounded git subprocesses.
//!
//! Transport goes through the git CLI so that credential helpers, proxies
//! and `https://token@host` endpoints behave exactly as they do for a user.
//! Every call has a deadline and the child is killed when it passes.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use rsc_config::CredentialProvider;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::SyncError;

pub(crate) struct GitRunner {
    root: PathBuf,
    timeout: Duration,
    credentials: Arc<dyn CredentialProvider>,
}

impl GitRunner {
    pub(crate) fn new(
        root: &Path,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            timeout,
            credentials,
        }
    }

    /// Run git and require a zero exit status. Returns trimmed stdout.
    pub(crate) async fn run(&self, args: &[&str]) -> Result<String, SyncError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(SyncError::Git {
                command: self.describe(args),
                stderr: self.redact_bytes(&output.stderr),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git and report whether it exited zero. Used for probes such as
    /// `diff --cached --quiet` where a non-zero status is an answer.
    pub(crate) async fn probe(&self, args: &[&str]) -> Result<bool, SyncError> {
        Ok(self.output(args).await?.status.success())
    }

    async fn output(&self, args: &[&str]) -> Result<Output, SyncError> {
        let mut command = TokioCommand::new("git");
        command
            .args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        tracing::debug!(command = %self.describe(args), "running git");
        timeout(self.timeout, command.output())
            .await
            .map_err(|_| SyncError::Timeout {
                command: self.describe(args),
                secs: self.timeout.as_secs(),
            })?
            .map_err(SyncError::from)
    }

    pub(crate) fn redact(&self, text: &str) -> String {
        self.credentials.redact(text)
    }

    fn redact_bytes(&self, bytes: &[u8]) -> String {
        self.redact(String::from_utf8_lossy(bytes).trim())
    }

    fn describe(&self, args: &[&str]) -> String {
        self.redact(&args.join(" "))
    }
}

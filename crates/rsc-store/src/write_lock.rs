//! Cross-process write lock for the record store.
//!
//! A lock file holding the owner's pid. Creation uses `create_new`, so only
//! one process can hold it; a lock left by a dead process is removed and
//! retried. The guard deletes the file on drop.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::StoreError;

const LOCK_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl WriteLockGuard {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Wait up to `timeout` for the lock at `lock_path`.
///
/// # Errors
///
/// Returns `StoreError::Locked` when another live process still holds the
/// lock after `timeout`, or when the lock file is unreadable for that long.
pub async fn acquire(lock_path: &Path, timeout: Duration) -> Result<WriteLockGuard, StoreError> {
    let started = Instant::now();

    loop {
        match try_acquire(lock_path) {
            Ok(guard) => return Ok(guard),
            Err(LockState::Stale(pid)) => {
                tracing::info!(pid, path = %lock_path.display(), "removing stale write lock");
                let _ = std::fs::remove_file(lock_path);
            }
            Err(state) => {
                if started.elapsed() >= timeout {
                    let holder = match state {
                        LockState::HeldBy(pid) => Some(pid),
                        LockState::Stale(_) | LockState::Unknown => None,
                    };
                    tracing::warn!(?holder, path = %lock_path.display(), "write lock wait timed out");
                    return Err(StoreError::Locked {
                        path: lock_path.to_path_buf(),
                    });
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(i32),
    Stale(i32),
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut pid_buf = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut pid_buf))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match pid_buf.trim().parse::<i32>().ok() {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(pid) => Err(LockState::Stale(pid)),
                // Writer may be between create and write; retry.
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: i32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}

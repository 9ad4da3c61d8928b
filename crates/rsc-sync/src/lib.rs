//! # rsc-sync
//!
//! Reconciles the portal's local files with a remote git repository.
//!
//! The coordinator pulls once per process before the first read and pushes
//! after every write. Repository inspection and initialisation use `gix`;
//! transport shells out to the git CLI with a deadline on every call.

pub mod coordinator;
pub mod error;
mod git;
pub mod repo;

pub use coordinator::{
    PullOutcome, PushOutcome, SkipReason, SyncCoordinator, SyncPhase, SyncSettings,
};
pub use error::SyncError;

//! Portal error types.

use rsc_core::CoreError;
use rsc_store::StoreError;
use thiserror::Error;

/// Failures of a portal operation. Sync problems never appear here; they are
/// reported as outcomes and written to the audit ledger.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Staff view requested for a grade that has not been unlocked.
    #[error("{grade} is locked; unlock it with the class password first")]
    AccessDenied { grade: String },

    /// Export requested for a class with no sheet.
    #[error("{class} has no records")]
    NoRecords { class: String },
}

impl PortalError {
    /// Whether retrying after the user closes another program may succeed.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Store(store) if store.is_retriable())
    }
}

//! # rsc-store
//!
//! Local persistence for the submission portal:
//! - `RecordTable`: one `.xlsx` workbook, one sheet per class section
//! - `ArtifactStore`: uploaded files under `{results}/{class}/`
//! - `SubmissionGuard`: at-most-one submission per admission number per class
//! - `AuditLog`: append-only CSV ledger (`Timestamp, Event, Details`)
//! - Roster CSV import and the cross-process write lock
//!
//! All I/O here is blocking. Callers that run on an async runtime serialize
//! writers through [`write_lock`] and their own mutex.

pub mod artifacts;
pub mod audit;
pub mod error;
pub mod guard;
pub mod import;
pub mod records;
pub mod workbook;
pub mod write_lock;

pub use artifacts::ArtifactStore;
pub use audit::AuditLog;
pub use error::StoreError;
pub use guard::{GuardVerdict, SubmissionGuard};
pub use records::RecordTable;
pub use workbook::{Cell, Sheet, SubmissionSlot, Workbook};

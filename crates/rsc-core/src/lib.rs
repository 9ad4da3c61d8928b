//! # rsc-core
//!
//! Core types shared by every portal crate:
//! - `ClassId` and the class-section catalog
//! - Submission and audit entities
//! - Artifact naming (the `{Name_With_Underscores}_{AdmissionNo}.{ext}` contract)
//! - The `AuditSink` capability used by crates that must log without failing
//! - Cross-cutting error types

pub mod audit;
pub mod classes;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod naming;

pub use audit::AuditSink;
pub use classes::ClassId;
pub use entities::{AuditEvent, RosterEntry, SubmissionRecord};
pub use enums::{ArtifactKind, AuditEventKind, AuditStatus, GuardPolicy};
pub use errors::CoreError;
pub use naming::ArtifactName;

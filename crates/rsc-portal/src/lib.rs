//! # rsc-portal
//!
//! The submission portal as a library. A `Portal` ties the record table,
//! artifact store, audit ledger and sync coordinator for one root together
//! and exposes what a front end needs:
//!
//! - students: [`Portal::submit`], [`Portal::has_submitted`]
//! - staff: [`Portal::unlock_class`], [`Portal::staff_records`],
//!   [`Portal::preview_artifact`], [`Portal::export_csv`],
//!   [`Portal::bulk_append`]
//! - admins: [`Portal::verify_admin_key`], [`Portal::audit_events_recent_first`]
//!
//! A local save is the success condition for every write. Pushes run after
//! it and their failures only reach the audit ledger.

pub mod error;
pub mod preview;
pub mod service;
pub mod staff;
pub mod submit;

pub use error::PortalError;
pub use preview::ArtifactPreview;
pub use service::Portal;
pub use staff::AccessSession;
pub use submit::{ACCEPTED_EXTENSIONS, ImportReport, SubmitOutcome, Submission};

//! Best-effort audit capability.
//!
//! Components that must record events without ever failing their own
//! operation (the sync coordinator, the portal service) depend on this
//! trait instead of a concrete ledger.

use crate::enums::{AuditEventKind, AuditStatus};

/// Append-only sink for audit events. Implementations swallow their own
/// failures and report them through `AuditStatus`.
pub trait AuditSink: Send + Sync {
    fn record(&self, kind: AuditEventKind, details: &str) -> AuditStatus;
}

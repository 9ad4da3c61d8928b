//! Persisted entities: submission rows, audit events and roster entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::AuditEventKind;

/// Timestamp layout used in both the workbook and the audit ledger.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way every persisted row stores it.
#[must_use]
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time in the persisted layout.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(chrono::Local::now().naive_local())
}

/// One row of a class table.
///
/// `admission_no` together with the class forms the dedup key. `score` is
/// assigned by the caller; roster imports leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRecord {
    pub timestamp: String,
    pub full_name: String,
    pub admission_no: String,
    pub score: Option<f64>,
}

impl SubmissionRecord {
    /// Build a record stamped with the current local time.
    #[must_use]
    pub fn now(full_name: &str, admission_no: &str, score: Option<f64>) -> Self {
        Self {
            timestamp: now_timestamp(),
            full_name: full_name.to_string(),
            admission_no: admission_no.to_string(),
            score,
        }
    }
}

/// One line of the audit ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub timestamp: String,
    pub kind: AuditEventKind,
    pub details: String,
}

/// One student parsed from a roster import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterEntry {
    pub full_name: String,
    pub admission_no: String,
}

//! Event kinds, artifact kinds and policy enums for the portal.
//!
//! `AuditEventKind` keeps the human-readable labels the audit ledger has
//! always used ("Student Submission", "Sync Error", ...), so existing ledgers
//! stay readable after an upgrade.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AuditEventKind
// ---------------------------------------------------------------------------

/// Kind of event recorded in the audit ledger.
///
/// Unknown labels found in an existing ledger are preserved as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum AuditEventKind {
    ClassUnlocked,
    FailedAccess,
    StudentSubmission,
    SyncError,
    PullError,
    BulkImport,
    Other(String),
}

impl AuditEventKind {
    /// Label written to the `Event` column of the ledger.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::ClassUnlocked => "Class Unlocked",
            Self::FailedAccess => "Failed Access",
            Self::StudentSubmission => "Student Submission",
            Self::SyncError => "Sync Error",
            Self::PullError => "Pull Error",
            Self::BulkImport => "Bulk Import",
            Self::Other(label) => label,
        }
    }

    /// Map a ledger label back to a kind. Matching ignores case and
    /// surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        [
            Self::ClassUnlocked,
            Self::FailedAccess,
            Self::StudentSubmission,
            Self::SyncError,
            Self::PullError,
            Self::BulkImport,
        ]
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
        .unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<AuditEventKind> for String {
    fn from(kind: AuditEventKind) -> Self {
        kind.label().to_string()
    }
}

impl From<String> for AuditEventKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

// ---------------------------------------------------------------------------
// AuditStatus
// ---------------------------------------------------------------------------

/// Result of a best-effort audit write. Never an error: callers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Recorded,
    Failed,
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// Coarse file type of a stored artifact, used by the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Pdf,
    Document,
    Other,
}

impl ArtifactKind {
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" | "odt" | "rtf" => Self::Document,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Document => "document",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GuardPolicy
// ---------------------------------------------------------------------------

/// What the submission guard does when the class table cannot be read.
///
/// ```text
/// fail_open   → treat as "not submitted" and let the submission proceed
/// fail_closed → surface the read error and block the submission
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    #[default]
    FailOpen,
    FailClosed,
}

impl GuardPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailOpen => "fail_open",
            Self::FailClosed => "fail_closed",
        }
    }
}

impl fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Append-only audit ledger: a CSV file with `Timestamp, Event, Details`.
//!
//! Recording is best effort. A failed write is logged and reported as
//! [`AuditStatus::Failed`], never raised, so audit trouble cannot block the
//! operation being audited.

use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rsc_core::entities::now_timestamp;
use rsc_core::{AuditEvent, AuditEventKind, AuditSink, AuditStatus};

use crate::error::StoreError;

const HEADER: [&str; 3] = ["Timestamp", "Event", "Details"];

pub struct AuditLog {
    path: PathBuf,
    append_guard: Mutex<()>,
}

impl AuditLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            append_guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the ledger cannot be opened or written.
    pub fn append(&self, kind: &AuditEventKind, details: &str) -> Result<AuditEvent, StoreError> {
        let event = AuditEvent {
            timestamp: now_timestamp(),
            kind: kind.clone(),
            details: details.to_string(),
        };
        self.append_event(&event)?;
        Ok(event)
    }

    /// Append a pre-built event.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the ledger cannot be opened or written.
    pub fn append_event(&self, event: &AuditEvent) -> Result<(), StoreError> {
        let _guard = self
            .append_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let needs_header = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.write_record([event.timestamp.as_str(), event.kind.label(), event.details.as_str()])?;
        writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, e.into_error()))?
            .flush()
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// All events in insertion order. Empty when the ledger does not exist.
    ///
    /// Rows with fewer than three fields are padded; extra fields are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the ledger exists but cannot be read.
    pub fn read_all(&self) -> Result<Vec<AuditEvent>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut events = Vec::new();
        for row in reader.records() {
            let row = row?;
            let field = |i: usize| row.get(i).unwrap_or_default().to_string();
            events.push(AuditEvent {
                timestamp: field(0),
                kind: AuditEventKind::from_label(&field(1)),
                details: field(2),
            });
        }
        Ok(events)
    }

    /// All events, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_all`].
    pub fn read_recent_first(&self) -> Result<Vec<AuditEvent>, StoreError> {
        let mut events = self.read_all()?;
        events.reverse();
        Ok(events)
    }
}

impl AuditSink for AuditLog {
    fn record(&self, kind: AuditEventKind, details: &str) -> AuditStatus {
        match self.append(&kind, details) {
            Ok(_) => AuditStatus::Recorded,
            Err(error) => {
                tracing::warn!(%error, event = kind.label(), "audit event not recorded");
                AuditStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ledger() -> (tempfile::TempDir, AuditLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("security_audit.csv"));
        (dir, log)
    }

    #[test]
    fn first_write_adds_header() {
        let (_dir, log) = ledger();
        assert_eq!(
            log.record(AuditEventKind::ClassUnlocked, "Access granted for JSS 1"),
            AuditStatus::Recorded
        );
        log.record(AuditEventKind::FailedAccess, "Invalid password attempt for SS 2");

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Timestamp,Event,Details");
        assert!(lines[1].ends_with(",Class Unlocked,Access granted for JSS 1"));
    }

    #[test]
    fn details_with_commas_round_trip() {
        let (_dir, log) = ledger();
        log.append(&AuditEventKind::StudentSubmission, "Ada Lovelace (1001), JSS 1A")
            .unwrap();
        let events = log.read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AuditEventKind::StudentSubmission);
        assert_eq!(events[0].details, "Ada Lovelace (1001), JSS 1A");
    }

    #[test]
    fn recent_first_reverses_order() {
        let (_dir, log) = ledger();
        for detail in ["one", "two", "three"] {
            log.append(&AuditEventKind::Other("Note".into()), detail).unwrap();
        }
        let details: Vec<_> = log
            .read_recent_first()
            .unwrap()
            .into_iter()
            .map(|e| e.details)
            .collect();
        assert_eq!(details, vec!["three", "two", "one"]);
    }

    #[test]
    fn missing_ledger_reads_empty() {
        let (_dir, log) = ledger();
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn unwritable_ledger_reports_failed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the open fail.
        let path = dir.path().join("ledger");
        fs::create_dir(&path).unwrap();
        let log = AuditLog::new(path);
        assert_eq!(
            log.record(AuditEventKind::SyncError, "push failed"),
            AuditStatus::Failed
        );
    }
}

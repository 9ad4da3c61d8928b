//! Submission guard: at most one accepted submission per admission number
//! per class.
//!
//! The guard is advisory. The authoritative check happens again inside
//! [`RecordTable::insert_if_absent`] under the table's write lock; the guard
//! exists so callers can refuse early, before any artifact is written.

use rsc_core::{ClassId, GuardPolicy};
use serde::Serialize;

use crate::error::StoreError;
use crate::records::RecordTable;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardVerdict {
    /// No record for this admission number.
    Clear,
    /// A scored record already exists. Roster rows do not count.
    AlreadySubmitted,
    /// The class table could not be read and the policy is fail-open.
    Unverified,
}

pub struct SubmissionGuard<'a> {
    table: &'a RecordTable,
    policy: GuardPolicy,
}

impl<'a> SubmissionGuard<'a> {
    #[must_use]
    pub const fn new(table: &'a RecordTable, policy: GuardPolicy) -> Self {
        Self { table, policy }
    }

    /// Check an admission number against the class table.
    ///
    /// # Errors
    ///
    /// Under `FailClosed`, any read failure is returned. Under `FailOpen`,
    /// read failures become `GuardVerdict::Unverified`.
    pub fn check(&self, class: &ClassId, admission_no: &str) -> Result<GuardVerdict, StoreError> {
        match self.table.has_submission(class, admission_no) {
            Ok(true) => Ok(GuardVerdict::AlreadySubmitted),
            Ok(false) => Ok(GuardVerdict::Clear),
            Err(error) => match self.policy {
                GuardPolicy::FailOpen => {
                    tracing::warn!(
                        %error,
                        class = %class,
                        "submission guard could not read class table; allowing submission"
                    );
                    Ok(GuardVerdict::Unverified)
                }
                GuardPolicy::FailClosed => Err(error),
            },
        }
    }

    /// Boolean form of [`Self::check`]. Unreadable tables count as "not
    /// submitted" under `FailOpen` and as "submitted" under `FailClosed`.
    #[must_use]
    pub fn has_submitted(&self, class: &ClassId, admission_no: &str) -> bool {
        match self.check(class, admission_no) {
            Ok(verdict) => verdict == GuardVerdict::AlreadySubmitted,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsc_core::{RosterEntry, SubmissionRecord};

    use crate::workbook::{Cell, Sheet, Workbook};

    fn setup() -> (tempfile::TempDir, RecordTable) {
        let dir = tempfile::tempdir().unwrap();
        let table = RecordTable::new(dir.path().join("book.xlsx"));
        (dir, table)
    }

    #[test]
    fn clear_then_submitted() {
        let (_dir, table) = setup();
        let class = ClassId::parse("JSS 1A").unwrap();
        let guard = SubmissionGuard::new(&table, GuardPolicy::FailOpen);

        assert_eq!(guard.check(&class, "1001").unwrap(), GuardVerdict::Clear);
        table
            .append(&class, &SubmissionRecord::now("Ada", "1001", Some(9.0)))
            .unwrap();
        assert!(guard.has_submitted(&class, "1001"));
        assert!(!guard.has_submitted(&class, "1002"));
    }

    #[test]
    fn numeric_cells_compare_as_text() {
        let (dir, table) = setup();
        let mut book = Workbook::default();
        book.sheets.push(Sheet {
            name: "SS 1A".into(),
            columns: vec!["Timestamp".into(), "Full Name".into(), "Admission No ".into()],
            rows: vec![vec![Cell::text("t"), Cell::text("Ada"), Cell::Number(2_024_017.0)]],
        });
        book.save(&dir.path().join("book.xlsx")).unwrap();

        let guard = SubmissionGuard::new(&table, GuardPolicy::FailOpen);
        let class = ClassId::parse("SS 1A").unwrap();
        assert!(guard.has_submitted(&class, "2024017"));
    }

    #[test]
    fn corrupt_table_fails_open_by_default() {
        let (dir, table) = setup();
        std::fs::write(dir.path().join("book.xlsx"), "garbage").unwrap();
        let class = ClassId::parse("JSS 2A").unwrap();

        let open = SubmissionGuard::new(&table, GuardPolicy::FailOpen);
        assert_eq!(open.check(&class, "1").unwrap(), GuardVerdict::Unverified);
        assert!(!open.has_submitted(&class, "1"));

        let closed = SubmissionGuard::new(&table, GuardPolicy::FailClosed);
        assert!(matches!(
            closed.check(&class, "1"),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(closed.has_submitted(&class, "1"));
    }

    #[test]
    fn wrong_shape_sheet_fails_open() {
        let (dir, table) = setup();
        let mut book = Workbook::default();
        book.sheets.push(Sheet {
            name: "JSS 3A".into(),
            columns: vec!["Name".into()],
            rows: vec![vec![Cell::text("Ada")]],
        });
        book.save(&dir.path().join("book.xlsx")).unwrap();

        let guard = SubmissionGuard::new(&table, GuardPolicy::FailOpen);
        let class = ClassId::parse("JSS 3A").unwrap();
        assert_eq!(guard.check(&class, "1").unwrap(), GuardVerdict::Unverified);
    }

    #[test]
    fn roster_rows_do_not_block_submission() {
        let (_dir, table) = setup();
        let class = ClassId::parse("JSS 1B").unwrap();
        let roster = [RosterEntry {
            full_name: "Ada".into(),
            admission_no: "1".into(),
        }];
        table.append_roster(&class, &roster, "2026-02-01 08:00:00").unwrap();

        let guard = SubmissionGuard::new(&table, GuardPolicy::FailClosed);
        assert_eq!(guard.check(&class, "1").unwrap(), GuardVerdict::Clear);
    }
}

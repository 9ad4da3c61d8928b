//! Record table: per-class submission rows in a shared workbook.
//!
//! Every mutation is a read-modify-write of the whole workbook. An internal
//! mutex serializes writers inside this process; cross-process exclusion is
//! the caller's job (see [`crate::write_lock`]).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rsc_core::{ClassId, GuardPolicy, RosterEntry, SubmissionRecord};

use crate::error::StoreError;
use crate::workbook::{SubmissionSlot, Workbook};

pub struct RecordTable {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl RecordTable {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_guard: Mutex::new(()),
        }
    }

    /// Path of the backing workbook.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows for a class, in submission order. Empty when the workbook or the
    /// class sheet does not exist yet.
    ///
    /// # Errors
    ///
    /// `Corrupt`/`Locked`/`Io` when the workbook cannot be read, and
    /// `MissingColumn` when the sheet has an unexpected shape.
    pub fn read(&self, class: &ClassId) -> Result<Vec<SubmissionRecord>, StoreError> {
        let Some(book) = Workbook::load(&self.path)? else {
            return Ok(Vec::new());
        };
        book.sheet(class.as_str())
            .map_or_else(|| Ok(Vec::new()), crate::workbook::Sheet::records)
    }

    /// Whether `admission_no` has a scored row in the class sheet. Roster
    /// rows without a score do not count.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::read`].
    pub fn has_submission(&self, class: &ClassId, admission_no: &str) -> Result<bool, StoreError> {
        let Some(book) = Workbook::load(&self.path)? else {
            return Ok(false);
        };
        match book.sheet(class.as_str()) {
            Some(sheet) => Ok(sheet.submission_slot(admission_no)? == SubmissionSlot::Submitted),
            None => Ok(false),
        }
    }

    /// Append a record to the class sheet, creating the sheet (or the whole
    /// workbook) when absent. Sibling sheets are written back unchanged.
    ///
    /// No uniqueness check; see [`Self::insert_if_absent`].
    ///
    /// # Errors
    ///
    /// `Locked` when another program holds the workbook, `Corrupt` when the
    /// existing workbook cannot be parsed, `Io` otherwise.
    pub fn append(&self, class: &ClassId, record: &SubmissionRecord) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut book = self.load_for_write()?;
        book.sheet_mut_or_insert(class.as_str()).push_record(record);
        book.save(&self.path)?;
        tracing::debug!(class = %class, admission_no = %record.admission_no, "record appended");
        Ok(())
    }

    /// Record a submission unless its admission number already has a
    /// scored row in the class sheet. Check and write happen under one lock.
    ///
    /// A roster row reserved for the admission number is filled in place.
    /// A sheet without an admission column is unreadable for the check:
    /// `FailOpen` appends anyway (the missing columns are added), while
    /// `FailClosed` returns the `MissingColumn` error.
    ///
    /// # Errors
    ///
    /// `DuplicateSubmission` when the admission number has submitted, plus
    /// the conditions of [`Self::append`].
    pub fn insert_if_absent(
        &self,
        class: &ClassId,
        record: &SubmissionRecord,
        policy: GuardPolicy,
    ) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut book = self.load_for_write()?;
        let sheet = book.sheet_mut_or_insert(class.as_str());

        let slot = match sheet.submission_slot(&record.admission_no) {
            Ok(slot) => slot,
            Err(error @ StoreError::MissingColumn { .. }) if policy == GuardPolicy::FailOpen => {
                tracing::warn!(%error, class = %class, "class sheet has no admission column; appending unchecked");
                SubmissionSlot::Absent
            }
            Err(error) => return Err(error),
        };

        match slot {
            SubmissionSlot::Submitted => {
                return Err(StoreError::DuplicateSubmission {
                    class: class.to_string(),
                    admission_no: record.admission_no.trim().to_string(),
                });
            }
            SubmissionSlot::Reserved(index) => sheet.fill_row(index, record),
            SubmissionSlot::Absent => sheet.push_record(record),
        }
        book.save(&self.path)?;
        tracing::debug!(class = %class, admission_no = %record.admission_no, ?slot, "record inserted");
        Ok(())
    }

    /// Append roster rows (blank score, shared timestamp), skipping admission
    /// numbers already present or repeated within `entries`. Returns the
    /// number of rows written.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::append`].
    pub fn append_roster(
        &self,
        class: &ClassId,
        entries: &[RosterEntry],
        timestamp: &str,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let mut book = self.load_for_write()?;
        let sheet = book.sheet_mut_or_insert(class.as_str());

        let mut appended = 0usize;
        for entry in entries {
            if sheet.contains_admission_no(&entry.admission_no)? {
                tracing::debug!(class = %class, admission_no = %entry.admission_no, "roster entry already present");
                continue;
            }
            sheet.push_record(&SubmissionRecord {
                timestamp: timestamp.to_string(),
                full_name: entry.full_name.clone(),
                admission_no: entry.admission_no.clone(),
                score: None,
            });
            appended += 1;
        }

        if appended > 0 {
            book.save(&self.path)?;
        }
        Ok(appended)
    }

    /// Names of all sheets, in workbook order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the workbook cannot be read.
    pub fn sheet_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(Workbook::load(&self.path)?
            .map(|book| book.sheet_names())
            .unwrap_or_default())
    }

    /// Sheets whose name starts with a grade label (`"JSS 1"` → `JSS 1A`, `JSS 1B`, ...).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the workbook cannot be read.
    pub fn sections_for_grade(&self, grade: &str) -> Result<Vec<String>, StoreError> {
        let grade = grade.trim();
        Ok(self
            .sheet_names()?
            .into_iter()
            .filter(|name| name.starts_with(grade))
            .collect())
    }

    /// The class sheet rendered as CSV with trimmed header labels.
    /// `None` when the class has no sheet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the workbook cannot be read or CSV encoding fails.
    pub fn export_csv(&self, class: &ClassId) -> Result<Option<String>, StoreError> {
        let Some(book) = Workbook::load(&self.path)? else {
            return Ok(None);
        };
        let Some(sheet) = book.sheet(class.as_str()) else {
            return Ok(None);
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(sheet.trimmed_columns())?;
        for row in &sheet.rows {
            writer.write_record(row.iter().map(crate::workbook::normalize_cell))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, e.into_error()))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn load_for_write(&self) -> Result<Workbook, StoreError> {
        Ok(Workbook::load(&self.path)?.unwrap_or_default())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//! Staff views: class unlocking, record listing, audit viewing and export.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::PoisonError;

use rsc_core::classes::is_grade;
use rsc_core::{AuditEvent, AuditEventKind, AuditSink, ClassId, CoreError, SubmissionRecord};

use crate::error::PortalError;
use crate::service::Portal;

/// Grades unlocked during this process's lifetime.
#[derive(Debug, Default)]
pub struct AccessSession {
    unlocked: BTreeSet<String>,
}

impl AccessSession {
    #[must_use]
    pub fn is_unlocked(&self, grade: &str) -> bool {
        self.unlocked.contains(grade.trim())
    }

    pub fn unlock(&mut self, grade: &str) {
        self.unlocked.insert(grade.trim().to_string());
    }

    #[must_use]
    pub fn unlocked(&self) -> Vec<String> {
        self.unlocked.iter().cloned().collect()
    }
}

impl Portal {
    /// Check a grade password. A match unlocks the grade for this session.
    /// Both outcomes are audited.
    ///
    /// # Errors
    ///
    /// `Core(UnknownValue)` when `grade` is not a known grade label.
    pub fn unlock_class(&self, grade: &str, password: &str) -> Result<bool, PortalError> {
        let grade = grade.trim();
        if !is_grade(grade) {
            return Err(CoreError::UnknownValue {
                kind: "grade",
                value: grade.to_string(),
            }
            .into());
        }

        let granted = self
            .config
            .access
            .password_for(grade)
            .is_some_and(|expected| expected == password);

        if granted {
            self.access_session().unlock(grade);
            self.audit.record(
                AuditEventKind::ClassUnlocked,
                &format!("Access granted for {grade}"),
            );
        } else {
            tracing::warn!(grade, "invalid class password");
            self.audit.record(
                AuditEventKind::FailedAccess,
                &format!("Invalid password attempt for {grade}"),
            );
        }
        Ok(granted)
    }

    #[must_use]
    pub fn is_unlocked(&self, grade: &str) -> bool {
        self.access_session().is_unlocked(grade)
    }

    /// Rows of a class, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` when the workbook cannot be read.
    pub async fn list_records(&self, class: &ClassId) -> Result<Vec<SubmissionRecord>, PortalError> {
        self.activate().await;
        Ok(self.records.read(class)?)
    }

    /// [`Self::list_records`] for staff: the class's grade must be unlocked.
    ///
    /// # Errors
    ///
    /// `AccessDenied` when the grade is locked (or the class belongs to no
    /// grade), plus the conditions of [`Self::list_records`].
    pub async fn staff_records(&self, class: &ClassId) -> Result<Vec<SubmissionRecord>, PortalError> {
        let grade = class.grade().unwrap_or(class.as_str());
        if !self.is_unlocked(grade) {
            return Err(PortalError::AccessDenied {
                grade: grade.to_string(),
            });
        }
        self.list_records(class).await
    }

    /// Sheet names beginning with the grade label, in workbook order.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` when the workbook cannot be read.
    pub async fn sections_for_grade(&self, grade: &str) -> Result<Vec<String>, PortalError> {
        self.activate().await;
        Ok(self.records.sections_for_grade(grade)?)
    }

    /// Locate a stored artifact regardless of its extension.
    ///
    /// # Errors
    ///
    /// `Store(NotFound)` when no file matches.
    pub async fn find_artifact(
        &self,
        class: &ClassId,
        full_name: &str,
        admission_no: &str,
    ) -> Result<PathBuf, PortalError> {
        self.activate().await;
        Ok(self
            .artifacts
            .find(class, full_name.trim(), admission_no.trim())?)
    }

    /// Whether `key` matches the configured admin key. An unset key never
    /// matches.
    #[must_use]
    pub fn verify_admin_key(&self, key: &str) -> bool {
        let access = &self.config.access;
        access.has_admin_key() && access.admin_key == key
    }

    /// The audit ledger, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` when the ledger cannot be read.
    pub async fn audit_events_recent_first(&self) -> Result<Vec<AuditEvent>, PortalError> {
        self.activate().await;
        Ok(self.audit.read_recent_first()?)
    }

    /// The class sheet as CSV with trimmed headers.
    ///
    /// # Errors
    ///
    /// `NoRecords` when the class has no sheet.
    pub async fn export_csv(&self, class: &ClassId) -> Result<String, PortalError> {
        self.activate().await;
        self.records
            .export_csv(class)?
            .ok_or_else(|| PortalError::NoRecords {
                class: class.to_string(),
            })
    }

    fn access_session(&self) -> std::sync::MutexGuard<'_, AccessSession> {
        self.access.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

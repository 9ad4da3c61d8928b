//! Student submission and roster import.

use std::io::Read;
use std::path::PathBuf;

use rsc_core::entities::now_timestamp;
use rsc_core::{
    ArtifactName, AuditEventKind, AuditSink, ClassId, CoreError, RosterEntry, SubmissionRecord,
};
use rsc_store::{GuardVerdict, StoreError, SubmissionGuard};
use rsc_sync::PushOutcome;
use serde::Serialize;

use crate::error::PortalError;
use crate::service::Portal;

/// File types a student may upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// One student's upload.
#[derive(Debug, Clone)]
pub struct Submission<'a> {
    pub full_name: &'a str,
    pub admission_no: &'a str,
    pub class: &'a ClassId,
    pub score: f64,
    pub bytes: &'a [u8],
    pub extension: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Saved locally. `sync` reports the push that followed; a failed push
    /// does not undo the submission.
    Accepted {
        record: SubmissionRecord,
        artifact: PathBuf,
        sync: PushOutcome,
    },
    AlreadySubmitted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub class: ClassId,
    pub appended: usize,
    pub sync: PushOutcome,
}

impl Portal {
    /// Accept a submission unless this admission number already submitted
    /// for the class.
    ///
    /// The duplicate check, artifact write and record insert all happen
    /// inside one write span, so two racing submissions cannot both pass.
    ///
    /// # Errors
    ///
    /// `Core` for blank or unsafe identities or a file type outside
    /// [`ACCEPTED_EXTENSIONS`], `Store` when the artifact or
    /// record cannot be written (`Locked` is retriable). Under the
    /// fail-closed guard policy an unreadable class table is also an error.
    pub async fn submit(&self, submission: Submission<'_>) -> Result<SubmitOutcome, PortalError> {
        let full_name = submission.full_name.trim();
        let admission_no = submission.admission_no.trim();
        let class = submission.class;
        ArtifactName::new(full_name, admission_no)?;
        let extension = accepted_extension(submission.extension)?;

        self.activate().await;

        let (record, artifact) = {
            let _span = self.begin_write().await?;

            let guard = SubmissionGuard::new(&self.records, self.config.general.guard_policy);
            let verdict = guard.check(class, admission_no)?;
            if verdict == GuardVerdict::AlreadySubmitted {
                tracing::info!(class = %class, admission_no, "duplicate submission refused");
                return Ok(SubmitOutcome::AlreadySubmitted);
            }

            let target =
                self.artifacts
                    .path_for(class, full_name, admission_no, &extension)?;
            let preexisting = target.exists();
            let artifact = self.artifacts.store(
                class,
                full_name,
                admission_no,
                submission.bytes,
                &extension,
            )?;

            let record = SubmissionRecord::now(full_name, admission_no, Some(submission.score));
            match self.records.insert_if_absent(
                class,
                &record,
                self.config.general.guard_policy,
            ) {
                Ok(()) => {}
                Err(StoreError::DuplicateSubmission { .. }) => {
                    if !preexisting {
                        self.artifacts.discard(&artifact);
                    }
                    return Ok(SubmitOutcome::AlreadySubmitted);
                }
                Err(error) => {
                    if !preexisting {
                        self.artifacts.discard(&artifact);
                    }
                    return Err(error.into());
                }
            }
            (record, artifact)
        };

        self.audit.record(
            AuditEventKind::StudentSubmission,
            &format!("{full_name} ({admission_no}) submitted for {class}"),
        );
        tracing::info!(class = %class, admission_no, artifact = %artifact.display(), "submission accepted");

        let sync = self.push().await;
        Ok(SubmitOutcome::Accepted {
            record,
            artifact,
            sync,
        })
    }

    /// Whether `admission_no` has a record in `class`.
    ///
    /// Follows the configured guard policy: fail-open reports `false` when
    /// the table cannot be read, fail-closed reports `true`.
    pub async fn has_submitted(&self, class: &ClassId, admission_no: &str) -> bool {
        self.activate().await;
        SubmissionGuard::new(&self.records, self.config.general.guard_policy)
            .has_submitted(class, admission_no.trim())
    }

    /// Append roster rows (blank score) for admission numbers not yet in the
    /// class, then push.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` when the workbook cannot be updated.
    pub async fn bulk_append(
        &self,
        class: &ClassId,
        entries: &[RosterEntry],
    ) -> Result<ImportReport, PortalError> {
        self.activate().await;

        let appended = {
            let _span = self.begin_write().await?;
            self.records
                .append_roster(class, entries, &now_timestamp())?
        };

        self.audit.record(
            AuditEventKind::BulkImport,
            &format!("{appended} students imported into {class}"),
        );
        tracing::info!(class = %class, appended, offered = entries.len(), "roster imported");

        let sync = self.push().await;
        Ok(ImportReport {
            class: class.clone(),
            appended,
            sync,
        })
    }

    /// Parse a roster CSV and [`Self::bulk_append`] it.
    ///
    /// # Errors
    ///
    /// `Store` for unreadable CSV (missing name or admission column) or a
    /// failed workbook update.
    pub async fn import_roster<R: Read>(
        &self,
        class: &ClassId,
        reader: R,
    ) -> Result<ImportReport, PortalError> {
        let entries = rsc_store::import::parse_roster(reader)?;
        self.bulk_append(class, &entries).await
    }
}

/// Lower-cased extension without its leading dot, if uploads of that type
/// are accepted.
fn accepted_extension(extension: &str) -> Result<String, CoreError> {
    let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "file type '{extension}' is not accepted (expected one of: {})",
            ACCEPTED_EXTENSIONS.join(", ")
        )))
    }
}

use rsc_core::SubmissionRecord;
use rsc_portal::Portal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SectionsArgs, StaffClassArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct RecordsResponse {
    class: String,
    rows: Vec<SubmissionRecord>,
}

#[derive(Debug, Serialize)]
struct SectionRow {
    section: String,
}

#[derive(Debug, Serialize)]
struct SectionsResponse {
    grade: String,
    rows: Vec<SectionRow>,
}

/// Handle `rsc records`.
pub async fn handle_records(
    args: &StaffClassArgs,
    portal: &Portal,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let class = super::parse_class(&args.class)?;
    super::unlock_for_class(portal, &class, &args.password)?;
    let rows = portal.staff_records(&class).await?;

    output(
        &RecordsResponse {
            class: class.to_string(),
            rows,
        },
        flags,
    )
}

/// Handle `rsc sections`.
pub async fn handle_sections(
    args: &SectionsArgs,
    portal: &Portal,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let grade = args.grade.trim();
    super::unlock_grade(portal, grade, &args.password)?;
    let rows = portal
        .sections_for_grade(grade)
        .await?
        .into_iter()
        .map(|section| SectionRow { section })
        .collect();

    output(
        &SectionsResponse {
            grade: grade.to_string(),
            rows,
        },
        flags,
    )
}

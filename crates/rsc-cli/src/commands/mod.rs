pub mod artifact;
pub mod audit;
pub mod dispatch;
pub mod export;
pub mod import;
pub mod records;
pub mod status;
pub mod submit;
pub mod sync;

use anyhow::Context;
use rsc_core::ClassId;
use rsc_portal::Portal;

/// Parse a class argument, warning when it is outside the school catalog.
pub fn parse_class(raw: &str) -> anyhow::Result<ClassId> {
    let class = ClassId::parse(raw).with_context(|| format!("invalid class '{raw}'"))?;
    if !class.is_cataloged() {
        tracing::warn!(class = %class, "class is not in the school catalog");
    }
    Ok(class)
}

/// Unlock the grade a class belongs to, or fail.
pub fn unlock_for_class(portal: &Portal, class: &ClassId, password: &str) -> anyhow::Result<()> {
    let grade = class
        .grade()
        .with_context(|| format!("{class} does not belong to a known grade"))?;
    unlock_grade(portal, grade, password)
}

pub fn unlock_grade(portal: &Portal, grade: &str, password: &str) -> anyhow::Result<()> {
    if !portal.unlock_class(grade, password)? {
        anyhow::bail!("invalid password for {grade}");
    }
    Ok(())
}

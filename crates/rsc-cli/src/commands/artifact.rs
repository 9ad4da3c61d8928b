use std::path::PathBuf;

use rsc_portal::Portal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ArtifactArgs, PreviewArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct FindResponse {
    class: String,
    path: PathBuf,
}

/// Handle `rsc find-artifact`.
pub async fn handle_find(
    args: &ArtifactArgs,
    portal: &Portal,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let class = super::parse_class(&args.class)?;
    let path = portal
        .find_artifact(&class, &args.name, &args.admission_no)
        .await?;
    output(
        &FindResponse {
            class: class.to_string(),
            path,
        },
        flags,
    )
}

/// Handle `rsc preview`.
pub async fn handle_preview(
    args: &PreviewArgs,
    portal: &Portal,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let class = super::parse_class(&args.artifact.class)?;
    super::unlock_for_class(portal, &class, &args.password)?;
    let preview = portal
        .preview_artifact(&class, &args.artifact.name, &args.artifact.admission_no)
        .await?;
    output(&preview, flags)
}

use anyhow::Context;
use rsc_portal::Portal;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::output::output;

/// Handle `rsc import`.
pub async fn handle(args: &ImportArgs, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    let class = super::parse_class(&args.staff.class)?;
    super::unlock_for_class(portal, &class, &args.staff.password)?;

    let roster = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read roster {}", args.file.display()))?;
    let report = portal
        .import_roster(&class, roster.as_slice())
        .await
        .context("roster import failed")?;

    output(&report, flags)
}

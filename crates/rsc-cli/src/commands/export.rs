use anyhow::Context;
use rsc_portal::Portal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse {
    class: String,
    path: String,
    bytes: usize,
}

/// Handle `rsc export`. Without `--output` the CSV goes to stdout as is,
/// whatever `--format` says.
pub async fn handle(args: &ExportArgs, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    let class = super::parse_class(&args.staff.class)?;
    super::unlock_for_class(portal, &class, &args.staff.password)?;
    let csv = portal.export_csv(&class).await?;

    let Some(path) = &args.output else {
        print!("{csv}");
        return Ok(());
    };
    tokio::fs::write(path, csv.as_bytes())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    output(
        &ExportResponse {
            class: class.to_string(),
            path: path.display().to_string(),
            bytes: csv.len(),
        },
        flags,
    )
}

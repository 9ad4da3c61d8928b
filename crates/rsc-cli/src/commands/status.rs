use rsc_portal::Portal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatusArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StatusResponse {
    class: String,
    admission_no: String,
    submitted: bool,
}

/// Handle `rsc status`.
pub async fn handle(args: &StatusArgs, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    let class = super::parse_class(&args.class)?;
    let submitted = portal.has_submitted(&class, &args.admission_no).await;

    output(
        &StatusResponse {
            class: class.to_string(),
            admission_no: args.admission_no.trim().to_string(),
            submitted,
        },
        flags,
    )
}

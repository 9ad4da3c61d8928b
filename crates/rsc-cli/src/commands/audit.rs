use rsc_core::AuditEvent;
use rsc_portal::Portal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AuditResponse {
    total: usize,
    rows: Vec<AuditEvent>,
}

/// Handle `rsc audit`.
pub async fn handle(args: &AuditArgs, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !portal.verify_admin_key(&args.admin_key) {
        anyhow::bail!("invalid admin key");
    }

    let mut rows = portal.audit_events_recent_first().await?;
    let total = rows.len();
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    output(&AuditResponse { total, rows }, flags)
}

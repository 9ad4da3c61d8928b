use rsc_portal::Portal;

use crate::cli::{GlobalFlags, SyncCommands};
use crate::output::output;

/// Handle `rsc sync pull|push`. Outcomes are printed, never raised: a failed
/// sync is already in the audit ledger.
pub async fn handle(action: &SyncCommands, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        SyncCommands::Pull => output(&portal.pull().await, flags),
        SyncCommands::Push => {
            portal.activate().await;
            output(&portal.push().await, flags)
        }
    }
}

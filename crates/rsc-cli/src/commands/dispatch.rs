use rsc_portal::Portal;
use rsc_sync::PullOutcome;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
///
/// The startup pull runs before any handler so that local writes made by the
/// command (audit rows from unlocking, for instance) land on top of the
/// remote state.
pub async fn dispatch(command: Commands, portal: &Portal, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !matches!(command, Commands::Sync { .. })
        && let Some(PullOutcome::Failed { message }) = portal.activate().await
    {
        tracing::warn!(%message, "startup pull failed; continuing with local state");
    }

    match command {
        Commands::Submit(args) => commands::submit::handle(&args, portal, flags).await,
        Commands::Status(args) => commands::status::handle(&args, portal, flags).await,
        Commands::Records(args) => commands::records::handle_records(&args, portal, flags).await,
        Commands::Sections(args) => commands::records::handle_sections(&args, portal, flags).await,
        Commands::FindArtifact(args) => commands::artifact::handle_find(&args, portal, flags).await,
        Commands::Preview(args) => commands::artifact::handle_preview(&args, portal, flags).await,
        Commands::Export(args) => commands::export::handle(&args, portal, flags).await,
        Commands::Import(args) => commands::import::handle(&args, portal, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, portal, flags).await,
        Commands::Sync { action } => commands::sync::handle(&action, portal, flags).await,
    }
}

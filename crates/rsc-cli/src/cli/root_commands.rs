use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Submit a project file for a student.
    Submit(SubmitArgs),
    /// Check whether an admission number has submitted for a class.
    Status(StatusArgs),
    /// List a class's records (requires the grade password).
    Records(StaffClassArgs),
    /// List the sections of a grade that have records.
    Sections(SectionsArgs),
    /// Locate a stored artifact.
    FindArtifact(ArtifactArgs),
    /// Show an artifact's location and inline preview (requires the grade password).
    Preview(PreviewArgs),
    /// Export a class sheet as CSV (requires the grade password).
    Export(ExportArgs),
    /// Import a roster CSV into a class (requires the grade password).
    Import(ImportArgs),
    /// Show the security audit ledger, newest first.
    Audit(AuditArgs),
    /// Synchronize with the remote repository.
    Sync {
        #[command(subcommand)]
        action: SyncCommands,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SyncCommands {
    /// Pull remote changes into the local repository.
    Pull,
    /// Commit local changes (if any) and push them.
    Push,
}

#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    /// Student's full name.
    #[arg(long)]
    pub name: String,
    /// Admission number.
    #[arg(long)]
    pub admission_no: String,
    /// Class section, e.g. "JSS 1A".
    #[arg(long)]
    pub class: String,
    /// File to upload.
    #[arg(long)]
    pub file: PathBuf,
    /// Score to record (default: random within the configured range).
    #[arg(long)]
    pub score: Option<f64>,
}

#[derive(Clone, Debug, Args)]
pub struct StatusArgs {
    #[arg(long)]
    pub class: String,
    #[arg(long)]
    pub admission_no: String,
}

#[derive(Clone, Debug, Args)]
pub struct StaffClassArgs {
    #[arg(long)]
    pub class: String,
    /// Password for the class's grade.
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct SectionsArgs {
    /// Grade label, e.g. "JSS 1".
    #[arg(long)]
    pub grade: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct ArtifactArgs {
    #[arg(long)]
    pub class: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub admission_no: String,
}

#[derive(Clone, Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub artifact: ArtifactArgs,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub staff: StaffClassArgs,
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub staff: StaffClassArgs,
    /// Roster CSV with name and admission number columns.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub admin_key: String,
    /// Show at most this many events.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

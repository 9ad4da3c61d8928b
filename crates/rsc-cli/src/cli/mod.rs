use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, SyncCommands};

/// Top-level CLI parser for the `rsc` binary.
#[derive(Debug, Parser)]
#[command(name = "rsc", version, about = "Project submission portal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Portal root directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat, SyncCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "rsc", "--format", "json", "--verbose", "--root", "/srv/portal", "sync", "push",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.root.as_deref(), Some("/srv/portal"));
        assert!(matches!(
            cli.command,
            Commands::Sync {
                action: SyncCommands::Push
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rsc",
            "status",
            "--class",
            "JSS 1A",
            "--admission-no",
            "1001",
            "--quiet",
        ])
        .unwrap();
        assert!(cli.quiet);
        let Commands::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.class, "JSS 1A");
        assert_eq!(args.admission_no, "1001");
    }

    #[test]
    fn submit_score_is_optional() {
        let cli = Cli::try_parse_from([
            "rsc",
            "submit",
            "--name",
            "Ada Lovelace",
            "--admission-no",
            "RSC/2026/001",
            "--class",
            "JSS 1A",
            "--file",
            "project.pdf",
        ])
        .unwrap();
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.score, None);
        assert_eq!(args.file.to_str(), Some("project.pdf"));
    }

    #[test]
    fn staff_commands_require_password() {
        let missing = Cli::try_parse_from(["rsc", "records", "--class", "JSS 1A"]);
        assert!(missing.is_err());
        let audit = Cli::try_parse_from(["rsc", "audit"]);
        assert!(audit.is_err());
    }
}

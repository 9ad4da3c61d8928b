use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod score;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("rsc error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    let root = resolve_root(flags.root.as_deref())?;
    let config = bootstrap::load_config(&root).await?;
    let portal = rsc_portal::Portal::from_config(&root, config);

    commands::dispatch::dispatch(cli.command, &portal, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("RSC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_root(root_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = root_override {
        let explicit = PathBuf::from(path);
        if explicit.is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --root '{}': directory does not exist",
            explicit.display()
        );
    }
    std::env::current_dir().context("failed to read current directory")
}

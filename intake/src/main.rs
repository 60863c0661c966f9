// intake/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug intake run ... to see every stage's details
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_dir,
            dry_run,
        } => commands::run::execute(project_dir, dry_run).await,
        Commands::Init { project_dir } => commands::init::execute(project_dir).await,
        Commands::Inspect {
            project_dir,
            table,
            limit,
        } => commands::inspect::execute(project_dir, table, limit).await,
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}

// intake/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Validation & incremental-load engine for batch warehouse ingestion", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs one batch (Extract -> Validate -> Load -> Audit)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Validate and audit without writing to the warehouse
        #[arg(long)]
        dry_run: bool,
    },

    /// 🏗️ Creates missing warehouse tables from the project's DDL script
    Init {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a warehouse table (columns + sample rows)
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 🧹 Removes run artifacts (target/ and logs/ by default)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

// intake/src/commands/mod.rs

pub mod clean;
pub mod init;
pub mod inspect;
pub mod run;

use anyhow::Context;
use std::path::Path;
use tracing::{debug, error, info};

use intake_core::IntakeError;
use intake_core::domain::project::ProjectConfig;
use intake_core::infrastructure::adapters::DuckDBWarehouse;
use intake_core::infrastructure::config::load_project_config;
use intake_core::infrastructure::fs::resolve;

pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    println!("⚙️  Loading configuration...");
    debug!(dir = ?project_dir, "Resolving project configuration");
    let config = load_project_config(project_dir).map_err(|e| {
        error!(dir = ?project_dir, "Configuration rejected");
        eprintln!("{:?}", miette::Report::new(e));
        anyhow::anyhow!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);
    Ok(config)
}

/// Opening the warehouse is the one startup step that must succeed.
pub(crate) fn open_warehouse(project_dir: &Path, config: &ProjectConfig) -> anyhow::Result<DuckDBWarehouse> {
    let db_path = if config.warehouse.path == ":memory:" {
        config.warehouse.path.clone()
    } else {
        resolve(project_dir, &config.warehouse.path)
            .to_string_lossy()
            .into_owned()
    };
    println!("   Warehouse: DuckDB 🦆 ({})", db_path);
    info!(path = %db_path, "Opening warehouse");
    DuckDBWarehouse::new(&db_path)
        .with_context(|| format!("Failed to open DuckDB warehouse at {}", db_path))
}

/// Domain and infrastructure errors carry miette diagnostics (code + help);
/// print them in full before handing the error back to anyhow.
pub(crate) fn report(err: IntakeError) -> anyhow::Error {
    error!(error = %err, "Command aborted");
    match err {
        IntakeError::Domain(e) => eprintln!("{:?}", miette::Report::new(e)),
        IntakeError::Infrastructure(e) => eprintln!("{:?}", miette::Report::new(e)),
        other => return anyhow::Error::new(other),
    }
    anyhow::anyhow!("intake aborted")
}

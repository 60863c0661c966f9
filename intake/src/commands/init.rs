// intake/src/commands/init.rs
//
// USE CASE: Create the warehouse tables the DDL script declares.

use std::path::PathBuf;

use intake_core::application::bootstrap_from_file;
use intake_core::infrastructure::fs::resolve;

use super::{load_config, open_warehouse, report};

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let Some(ddl_path) = config.ddl_path.as_deref() else {
        anyhow::bail!("❌ No `ddl_path` in the project configuration, nothing to create");
    };
    let ddl_path = resolve(&project_dir, ddl_path);
    let warehouse = open_warehouse(&project_dir, &config)?;

    println!("🏗️  Applying DDL from {}...", ddl_path.display());
    let result = bootstrap_from_file(&warehouse, &ddl_path)
        .await
        .map_err(report)?;

    for table in &result.created {
        println!("   ✅ created {}", table);
    }
    for table in &result.skipped {
        println!("   ⏭️  {} already exists", table);
    }
    for table in &result.failed {
        eprintln!("   ❌ {} could not be created", table);
    }

    println!(
        "✨ {} created, {} already present",
        result.created.len(),
        result.skipped.len()
    );
    Ok(())
}

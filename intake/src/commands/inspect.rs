// intake/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (columns + sample rows).

use std::path::PathBuf;

use intake_core::application::inspect_table;

use super::{load_config, open_warehouse, report};

pub async fn execute(project_dir: PathBuf, table: String, limit: usize) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let warehouse = open_warehouse(&project_dir, &config)?;

    let sample = inspect_table(&warehouse, &table, limit)
        .await
        .map_err(report)?;

    println!("\n🔍 Inspecting Table: '{}' ({} rows)", sample.table, sample.total);
    println!("   Columns: [{}]", sample.columns.join(", "));
    println!("   --- Rows (Limit {}) ---", limit);

    for row in &sample.rows {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("   ➜ {}", values.join(" | "));
    }

    Ok(())
}

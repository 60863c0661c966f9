// intake/src/commands/run.rs
//
// USE CASE: Run one batch through the pipeline.

use std::path::PathBuf;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use intake_core::application::{LoadOutcome, RunOptions, RunResult, run_pipeline};
use intake_core::infrastructure::adapters::HttpPageSource;
use tracing::{info, warn};

use super::{load_config, open_warehouse, report};

pub async fn execute(project_dir: PathBuf, dry_run: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Config + adapters (Infra)
    let config = load_config(&project_dir)?;
    let warehouse = open_warehouse(&project_dir, &config)?;
    let page_source = HttpPageSource::new(&config.remote.base_url);

    // B. Run the Pipeline (Application Layer)
    let options = RunOptions { dry_run };
    let result = run_pipeline(&config, &project_dir, &warehouse, &page_source, &options)
        .await
        .map_err(report)?;

    info!(
        inserted = result.rows_inserted,
        failed = result.errors.len(),
        "Run summary ready"
    );
    println!("{}", summary_table(&result));
    for warning in &result.warnings {
        warn!(%warning, "Run warning");
        println!("⚠️  {}", warning);
    }

    if result.success {
        println!("\n✨ SUCCESS! Run finished in {:.2?}", start.elapsed());
    } else {
        for error in &result.errors {
            eprintln!("❌ {}", error);
        }
        eprintln!("\n❌ FAILURE. {} tables failed to load.", result.errors.len());
        // Exit with error code for CI/CD
        std::process::exit(1);
    }

    Ok(())
}

fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Table", "Status", "Inserted", "Already present"]);

    for load in &result.load.tables {
        let (status, existing, color) = match &load.outcome {
            LoadOutcome::Initial { .. } => ("initial", "0".to_string(), Color::Green),
            LoadOutcome::Incremental { existing, .. } => {
                ("incremental", existing.to_string(), Color::Green)
            }
            LoadOutcome::UpToDate { existing } => ("up to date", existing.to_string(), Color::Blue),
            LoadOutcome::Skipped { .. } => ("skipped", "-".to_string(), Color::Yellow),
            LoadOutcome::Failed { .. } => ("failed", "-".to_string(), Color::Red),
        };
        table.add_row(vec![
            Cell::new(&load.table),
            Cell::new(status).fg(color),
            Cell::new(load.outcome.inserted()),
            Cell::new(existing),
        ]);
    }

    table.add_row(vec![
        Cell::new("extracted"),
        Cell::new(format!("{} tables", result.tables_extracted)),
        Cell::new(result.rows_extracted),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("invalid PK / FK rows"),
        Cell::new(""),
        Cell::new(format!("{} / {}", result.invalid_pk_rows, result.invalid_fk_rows)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("quality issues"),
        Cell::new(""),
        Cell::new(result.quality_issues),
        Cell::new(""),
    ]);

    table
}

// intake-core/src/application/bootstrap.rs

use serde::Serialize;
use std::path::Path;
use tracing::{error, info, instrument};

use crate::error::IntakeError;
use crate::infrastructure::ddl::parse_create_tables;
use crate::ports::warehouse::Warehouse;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    pub created: Vec<String>,
    /// Already present in the warehouse.
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Creates the tables of a DDL script that the warehouse does not have yet.
/// Existing tables are never altered.
#[instrument(skip_all)]
pub async fn bootstrap_schema(warehouse: &dyn Warehouse, script: &str) -> Result<BootstrapReport, IntakeError> {
    let mut report = BootstrapReport::default();

    for statement in parse_create_tables(script) {
        if warehouse.table_exists(&statement.table).await? {
            info!(table = %statement.table, "Table already exists");
            report.skipped.push(statement.table);
            continue;
        }

        match warehouse.execute(&statement.sql).await {
            Ok(()) => {
                info!(table = %statement.table, "🧱 Table created");
                report.created.push(statement.table);
            }
            Err(e) => {
                error!(table = %statement.table, error = %e, "Table creation failed");
                report.failed.push(statement.table);
            }
        }
    }

    Ok(report)
}

pub async fn bootstrap_from_file(warehouse: &dyn Warehouse, ddl_path: &Path) -> Result<BootstrapReport, IntakeError> {
    let script = std::fs::read_to_string(ddl_path)?;
    bootstrap_schema(warehouse, &script).await
}

// intake-core/src/application/inspect.rs

use crate::domain::dataset::Value;
use crate::error::IntakeError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::warehouse::{Warehouse, quote_ident};

/// Columns and the first rows of a warehouse table.
#[derive(Debug, Clone)]
pub struct TableSample {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total: u64,
}

pub async fn inspect_table(
    warehouse: &dyn Warehouse,
    table: &str,
    limit: usize,
) -> Result<TableSample, IntakeError> {
    if !warehouse.table_exists(table).await? {
        return Err(InfrastructureError::ConfigError(format!(
            "Table '{}' does not exist in the warehouse",
            table
        ))
        .into());
    }

    let columns = warehouse.table_columns(table).await?;
    let total = warehouse
        .query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)))
        .await?;
    let rows = warehouse
        .fetch_rows(&format!("SELECT * FROM {} LIMIT {}", quote_ident(table), limit))
        .await?;

    Ok(TableSample {
        table: table.to_string(),
        columns,
        rows,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::DuckDBWarehouse;
    use anyhow::Result;

    #[tokio::test]
    async fn test_sample_is_limited() -> Result<()> {
        let warehouse = DuckDBWarehouse::new(":memory:")?;
        warehouse
            .execute("CREATE TABLE sellers AS SELECT 's' || range AS seller_id FROM range(10)")
            .await?;

        let sample = inspect_table(&warehouse, "sellers", 3).await?;

        assert_eq!(sample.columns, vec!["seller_id"]);
        assert_eq!(sample.rows.len(), 3);
        assert_eq!(sample.total, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() -> Result<()> {
        let warehouse = DuckDBWarehouse::new(":memory:")?;
        assert!(inspect_table(&warehouse, "nope", 3).await.is_err());
        Ok(())
    }
}

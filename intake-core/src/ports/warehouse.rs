// intake-core/src/ports/warehouse.rs

// What the pipeline needs from a relational warehouse, without knowing which
// engine sits behind it.

use async_trait::async_trait;

use crate::domain::dataset::{Record, Value};
use crate::error::IntakeError;

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), IntakeError>;

    /// First column of the first row, as an unsigned count.
    async fn query_scalar(&self, query: &str) -> Result<u64, IntakeError>;

    /// Every row of a query, cells converted to [`Value`].
    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<Value>>, IntakeError>;

    /// Column names of an existing table, in declaration order.
    async fn table_columns(&self, table: &str) -> Result<Vec<String>, IntakeError>;

    /// Appends `rows` to `table` inside one transaction. Returns rows written.
    async fn insert_rows(
        &self,
        table: &str,
        columns: &[String],
        rows: &[Record],
    ) -> Result<u64, IntakeError>;

    async fn table_exists(&self, table: &str) -> Result<bool, IntakeError>;

    fn engine_name(&self) -> &str;
}

/// Double-quoted SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

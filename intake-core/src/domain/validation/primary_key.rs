// intake-core/src/domain/validation/primary_key.rs

use tracing::{debug, info, instrument};

use super::issue::{ErrorKind, ValidationError, aggregate};
use crate::domain::dataset::{Dataset, Table};
use crate::domain::schema::PrimaryKeyMap;

pub struct PrimaryKeyValidator;

impl PrimaryKeyValidator {
    /// Removes every row holding a null in any primary-key column.
    /// Tables without a declared key pass through untouched.
    #[instrument(skip_all, fields(tables = dataset.len()))]
    pub fn validate(dataset: Dataset, pk_map: &PrimaryKeyMap) -> (Dataset, Vec<ValidationError>) {
        let mut cleaned = Dataset::new();
        let mut errors = Vec::new();

        for table in dataset {
            match pk_map.get(table.name()) {
                Some(pk_cols) => {
                    let (table, table_errors) = Self::validate_table(table, pk_cols);
                    errors.extend(table_errors);
                    cleaned.insert(table);
                }
                None => {
                    debug!(table = table.name(), "No primary key declared, skipping");
                    cleaned.insert(table);
                }
            }
        }

        (cleaned, errors)
    }

    /// A key column absent from the table reads as null on every row.
    pub fn validate_table(table: Table, pk_cols: &[String]) -> (Table, Vec<ValidationError>) {
        let indexes = table.column_indexes(pk_cols);
        let (kept, removed) = table.partition(|row| row.key_at(&indexes).iter().all(Option::is_some));

        if removed.is_empty() {
            return (kept, Vec::new());
        }

        info!(
            table = kept.name(),
            removed = removed.len(),
            "🔑 Removing rows with NULL primary key values"
        );

        let message = format!("NULL values in PK columns: {}", pk_cols.join(", "));
        let errors = aggregate(
            kept.name(),
            ErrorKind::InvalidPk,
            removed.iter().map(|_| message.clone()),
        );
        (kept, errors)
    }
}

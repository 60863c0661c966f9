// intake-core/src/application/discovery.rs

use tracing::{info, instrument};

use crate::domain::schema::PrimaryKeyMap;
use crate::error::IntakeError;
use crate::ports::warehouse::Warehouse;

const PRIMARY_KEY_QUERY: &str = "\
SELECT tc.table_name, kcu.column_name \
FROM information_schema.table_constraints tc \
JOIN information_schema.key_column_usage kcu \
  ON tc.constraint_name = kcu.constraint_name \
 AND tc.table_name = kcu.table_name \
WHERE tc.constraint_type = 'PRIMARY KEY' \
ORDER BY tc.table_name, kcu.ordinal_position";

/// Reads every declared primary key from the warehouse catalog. Tables
/// without one are simply absent from the map.
#[instrument(skip_all, fields(engine = warehouse.engine_name()))]
pub async fn discover_primary_keys(warehouse: &dyn Warehouse) -> Result<PrimaryKeyMap, IntakeError> {
    let rows = warehouse.fetch_rows(PRIMARY_KEY_QUERY).await?;

    let mut keys = PrimaryKeyMap::new();
    for row in rows {
        if let [table, column, ..] = row.as_slice() {
            keys.push(table.to_string(), column.to_string());
        }
    }

    info!(tables = keys.len(), "Primary keys discovered");
    Ok(keys)
}

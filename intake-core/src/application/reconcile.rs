// intake-core/src/application/reconcile.rs

use tracing::{info, instrument, warn};

use std::collections::BTreeMap;

use crate::domain::load::RecordCount;
use crate::ports::warehouse::{Warehouse, quote_ident};

/// Compares each *extracted* table's row count (taken before validation)
/// with the warehouse count. A table whose count query fails is logged and
/// left out.
#[instrument(skip_all, fields(tables = extracted.len()))]
pub async fn reconcile_counts(
    warehouse: &dyn Warehouse,
    extracted: &BTreeMap<String, u64>,
) -> Vec<RecordCount> {
    let mut counts = Vec::with_capacity(extracted.len());

    for (table, expected) in extracted {
        let query = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        match warehouse.query_scalar(&query).await {
            Ok(actual) => {
                let count = RecordCount::new(table, *expected, actual);
                if !count.matches() {
                    info!(
                        table = %table,
                        expected,
                        actual,
                        "Record count differs from extraction"
                    );
                }
                counts.push(count);
            }
            Err(e) => warn!(table = %table, error = %e, "Count query failed, skipping"),
        }
    }

    counts
}

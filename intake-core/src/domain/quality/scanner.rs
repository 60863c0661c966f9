// intake-core/src/domain/quality/scanner.rs

use std::collections::HashMap;
use tracing::{debug, instrument};

use super::config::{QualityConfig, TemporalCheck};
use super::timestamp::parse_timestamp;
use crate::domain::dataset::{Dataset, Table};
use crate::domain::validation::{ErrorKind, ValidationError};

pub struct QualityScanner;

impl QualityScanner {
    /// Runs every enabled scan over the validated dataset. Nothing is removed.
    #[instrument(skip_all, fields(tables = dataset.len()))]
    pub fn scan(dataset: &Dataset, config: &QualityConfig) -> Vec<ValidationError> {
        let mut issues = Vec::new();

        for table in dataset.tables() {
            if config.null_scan {
                issues.extend(Self::scan_nulls(table));
            }
            if config.duplicate_scan {
                issues.extend(Self::scan_duplicates(table));
            }
        }

        for check in &config.temporal {
            match dataset.get(&check.table) {
                Some(table) => issues.extend(Self::scan_temporal(table, check)),
                None => debug!(table = %check.table, "Temporal check target not extracted"),
            }
        }

        issues
    }

    /// One issue per column holding at least one null.
    pub fn scan_nulls(table: &Table) -> Vec<ValidationError> {
        table
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(idx, column)| {
                let nulls = table.rows().iter().filter(|r| r.get(idx).is_null()).count();
                (nulls > 0).then(|| {
                    ValidationError::new(
                        table.name(),
                        ErrorKind::DataQuality,
                        nulls,
                        format!("Null value in column '{}'", column),
                    )
                })
            })
            .collect()
    }

    /// Every member of a group of identical rows is flagged, the first
    /// occurrence included.
    pub fn scan_duplicates(table: &Table) -> Option<ValidationError> {
        let mut groups: HashMap<Vec<Option<String>>, usize> = HashMap::new();
        for row in table.rows() {
            *groups.entry(row.key()).or_default() += 1;
        }

        let flagged: usize = groups.values().filter(|&&n| n > 1).sum();
        (flagged > 0).then(|| {
            ValidationError::new(
                table.name(),
                ErrorKind::DataQuality,
                flagged,
                "Entire row is duplicated",
            )
        })
    }

    /// A row violates the ordering when purchase > approval, approval >
    /// carrier or carrier > delivery. A comparison with a missing or
    /// unparsable side never counts as a violation.
    pub fn scan_temporal(table: &Table, check: &TemporalCheck) -> Option<ValidationError> {
        let indexes = table.column_indexes(&check.columns);

        let violations = table
            .rows()
            .iter()
            .filter(|row| {
                let stamps: Vec<_> = indexes
                    .iter()
                    .map(|idx| idx.and_then(|i| parse_timestamp(row.get(i))))
                    .collect();
                stamps.windows(2).any(|pair| match (pair[0], pair[1]) {
                    (Some(earlier), Some(later)) => earlier > later,
                    _ => false,
                })
            })
            .count();

        (violations > 0).then(|| {
            ValidationError::new(
                table.name(),
                ErrorKind::DataQuality,
                violations,
                "Date logic error",
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;
    use anyhow::Result;

    fn orders(rows: Vec<[&str; 4]>) -> Result<Table> {
        let columns = TemporalCheck::orders().columns;
        let rows = rows
            .into_iter()
            .map(|r| {
                r.iter()
                    .map(|s| if s.is_empty() { Value::Null } else { Value::from(*s) })
                    .collect::<Vec<Value>>()
            })
            .collect();
        Ok(Table::with_rows("orders", columns, rows)?)
    }

    #[test]
    fn test_null_scan_counts_per_column() -> Result<()> {
        let table = Table::with_rows(
            "customers",
            vec!["customer_id".into(), "city".into(), "state".into()],
            vec![
                vec!["c1".into(), Value::Null, "SP".into()],
                vec!["c2".into(), Value::Null, Value::Null],
                vec!["c3".into(), "rio".into(), "RJ".into()],
            ],
        )?;

        let issues = QualityScanner::scan_nulls(&table);

        let summary: Vec<(&str, usize)> = issues
            .iter()
            .map(|i| (i.detail.as_str(), i.affected_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Null value in column 'city'", 2),
                ("Null value in column 'state'", 1),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_row_repeated_three_times_flags_three() -> Result<()> {
        let table = Table::with_rows(
            "geolocation",
            vec!["zip".into(), "city".into()],
            vec![
                vec![Value::Int(1037), "sao paulo".into()],
                vec![Value::Int(1037), "sao paulo".into()],
                vec![Value::Int(1046), "sao paulo".into()],
                vec![Value::Int(1037), "sao paulo".into()],
            ],
        )?;

        let issue = QualityScanner::scan_duplicates(&table).unwrap();

        assert_eq!(issue.affected_count, 3);
        assert_eq!(issue.detail, "Entire row is duplicated");
        assert_eq!(issue.kind, ErrorKind::DataQuality);
        Ok(())
    }

    #[test]
    fn test_unique_rows_yield_no_duplicate_issue() -> Result<()> {
        let table = Table::with_rows(
            "sellers",
            vec!["seller_id".into()],
            vec![vec!["s1".into()], vec!["s2".into()]],
        )?;
        assert!(QualityScanner::scan_duplicates(&table).is_none());
        Ok(())
    }

    #[test]
    fn test_purchase_after_approval_is_flagged() -> Result<()> {
        let table = orders(vec![
            [
                "2017-10-02 10:56:33",
                "2017-10-01 11:07:15",
                "2017-10-04 19:55:00",
                "2017-10-10 21:25:13",
            ],
            [
                "2017-10-02 10:56:33",
                "2017-10-02 11:07:15",
                "2017-10-04 19:55:00",
                "2017-10-10 21:25:13",
            ],
        ])?;

        let issue = QualityScanner::scan_temporal(&table, &TemporalCheck::orders()).unwrap();

        assert_eq!(issue.affected_count, 1);
        assert_eq!(issue.detail, "Date logic error");
        Ok(())
    }

    #[test]
    fn test_unparsable_or_missing_side_never_flags_alone() -> Result<()> {
        let table = orders(vec![
            ["2017-10-02 10:56:33", "garbage", "2017-10-04 19:55:00", ""],
            ["2017-10-02 10:56:33", "", "", ""],
            ["", "2017-10-02 11:07:15", "2017-10-01 00:00:00", ""],
        ])?;

        let issue = QualityScanner::scan_temporal(&table, &TemporalCheck::orders()).unwrap();

        // only the third row (approval > carrier) is a violation
        assert_eq!(issue.affected_count, 1);
        Ok(())
    }

    #[test]
    fn test_scan_respects_toggles() -> Result<()> {
        let table = Table::with_rows(
            "orders",
            vec!["order_id".into()],
            vec![vec![Value::Null], vec![Value::Null]],
        )?;
        let dataset: Dataset = [table].into_iter().collect();

        let all = QualityScanner::scan(&dataset, &QualityConfig::default());
        assert_eq!(all.len(), 2);

        let config = QualityConfig {
            null_scan: false,
            duplicate_scan: false,
            temporal: Vec::new(),
        };
        assert!(QualityScanner::scan(&dataset, &config).is_empty());
        Ok(())
    }
}

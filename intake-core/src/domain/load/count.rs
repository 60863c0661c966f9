// intake-core/src/domain/load/count.rs

use chrono::NaiveDateTime;
use serde::Serialize;

/// Extracted vs. warehouse row count for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCount {
    pub table: String,
    pub expected: u64,
    pub actual: u64,
    pub timestamp: NaiveDateTime,
}

impl RecordCount {
    pub fn new(table: &str, expected: u64, actual: u64) -> Self {
        Self {
            table: table.to_string(),
            expected,
            actual,
            timestamp: chrono::Local::now().naive_local(),
        }
    }

    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

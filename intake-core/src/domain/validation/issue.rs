// intake-core/src/domain/validation/issue.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidPk,
    InvalidFk,
    DataQuality,
}

impl ErrorKind {
    /// Label written to the `Error Type` column of the audit logs.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPk => "Invalid PK",
            ErrorKind::InvalidFk => "Invalid FK",
            ErrorKind::DataQuality => "Data Quality",
        }
    }
}

/// One aggregated finding: `affected_count` rows produced the same `detail`.
/// Validation findings are data conditions, never `Err` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub table: String,
    pub kind: ErrorKind,
    pub affected_count: usize,
    pub detail: String,
    pub timestamp: NaiveDateTime,
}

impl ValidationError {
    pub fn new(table: &str, kind: ErrorKind, affected_count: usize, detail: impl Into<String>) -> Self {
        Self {
            table: table.to_string(),
            kind,
            affected_count,
            detail: detail.into(),
            timestamp: chrono::Local::now().naive_local(),
        }
    }
}

/// Buckets one message per affected row into one error per distinct message,
/// in first-seen order. Aggregation is scoped to this call only.
pub fn aggregate<I>(table: &str, kind: ErrorKind, messages: I) -> Vec<ValidationError>
where
    I: IntoIterator<Item = String>,
{
    let timestamp = chrono::Local::now().naive_local();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut errors: Vec<ValidationError> = Vec::new();

    for message in messages {
        match slots.get(&message) {
            Some(&slot) => errors[slot].affected_count += 1,
            None => {
                slots.insert(message.clone(), errors.len());
                errors.push(ValidationError {
                    table: table.to_string(),
                    kind,
                    affected_count: 1,
                    detail: message,
                    timestamp,
                });
            }
        }
    }

    errors
}

/// Total rows affected across `errors`.
pub fn affected_rows(errors: &[ValidationError]) -> usize {
    errors.iter().map(|e| e.affected_count).sum()
}

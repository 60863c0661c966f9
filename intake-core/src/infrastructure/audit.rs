// intake-core/src/infrastructure/audit.rs

use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::domain::load::RecordCount;
use crate::domain::validation::ValidationError;
use crate::infrastructure::error::InfrastructureError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RECORD_COUNT_HEADER: [&str; 4] = ["Table Name", "Expected Records", "Actual Records", "Timestamp"];
const INVALID_KEY_HEADER: [&str; 5] = [
    "Table Name",
    "Error Type",
    "Affected Records Count",
    "Error Details",
    "Timestamp",
];
const DATA_QUALITY_HEADER: [&str; 4] = [
    "Table Name",
    "Affected Records Count",
    "Error Details",
    "Timestamp",
];

/// Append-only CSV audit sink. Holds no state: every call names its file.
pub struct AuditLogger;

impl AuditLogger {
    pub fn log_record_counts(path: &Path, counts: &[RecordCount]) -> Result<usize, InfrastructureError> {
        let rows = counts
            .iter()
            .map(|c| {
                vec![
                    c.table.clone(),
                    c.expected.to_string(),
                    c.actual.to_string(),
                    c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                ]
            })
            .collect();
        append_rows(path, &RECORD_COUNT_HEADER, rows)
    }

    pub fn log_invalid_pks(path: &Path, errors: &[ValidationError]) -> Result<usize, InfrastructureError> {
        append_rows(path, &INVALID_KEY_HEADER, key_rows(errors))
    }

    pub fn log_invalid_fks(path: &Path, errors: &[ValidationError]) -> Result<usize, InfrastructureError> {
        append_rows(path, &INVALID_KEY_HEADER, key_rows(errors))
    }

    pub fn log_data_quality(path: &Path, issues: &[ValidationError]) -> Result<usize, InfrastructureError> {
        let rows = issues
            .iter()
            .map(|i| {
                vec![
                    i.table.clone(),
                    i.affected_count.to_string(),
                    i.detail.clone(),
                    i.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                ]
            })
            .collect();
        append_rows(path, &DATA_QUALITY_HEADER, rows)
    }
}

fn key_rows(errors: &[ValidationError]) -> Vec<Vec<String>> {
    errors
        .iter()
        .map(|e| {
            vec![
                e.table.clone(),
                e.kind.label().to_string(),
                e.affected_count.to_string(),
                e.detail.clone(),
                e.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ]
        })
        .collect()
}

/// Header goes in only when the file is created. An empty batch never
/// touches the disk.
fn append_rows(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<usize, InfrastructureError> {
    if rows.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if is_new {
        writer.write_record(header)?;
    }
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!(path = ?path, rows = rows.len(), "Audit rows appended");
    Ok(rows.len())
}

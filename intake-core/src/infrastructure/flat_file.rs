// intake-core/src/infrastructure/flat_file.rs

use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

use crate::domain::dataset::{Table, Value};
use crate::infrastructure::error::InfrastructureError;

fn re_dataset_file() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^olist_(.+)_dataset$")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

/// `olist_<name>_dataset.csv` maps to `<name>`, any other file to its stem.
pub fn table_name_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    match re_dataset_file().captures(stem) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()),
        None => Some(stem.to_string()),
    }
}

/// `*.csv` files directly under `dir` (no recursion), sorted by path.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, InfrastructureError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

#[derive(Clone, Copy)]
enum ColumnType {
    Int,
    Float,
    Text,
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut guess = ColumnType::Int;
    for cell in cells {
        let cell = cell.trim();
        guess = match guess {
            ColumnType::Int if cell.parse::<i64>().is_ok() => ColumnType::Int,
            ColumnType::Int | ColumnType::Float
                if cell.parse::<f64>().is_ok_and(|f| f.is_finite()) =>
            {
                ColumnType::Float
            }
            _ => return ColumnType::Text,
        };
    }
    guess
}

fn convert(cell: &str, column_type: ColumnType) -> Value {
    let trimmed = cell.trim();
    match column_type {
        ColumnType::Int => trimmed.parse::<i64>().map(Value::Int).unwrap_or_else(|_| cell.into()),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| cell.into()),
        ColumnType::Text => Value::from(cell),
    }
}

/// Reads one CSV file into a typed table. Cells equal to a null marker become
/// [`Value::Null`]; each column is typed Int, Float or Text from its non-null
/// cells.
pub fn read_csv_table(
    path: &Path,
    table_name: &str,
    null_markers: &[String],
) -> Result<Table, InfrastructureError> {
    let markers: HashSet<&str> = null_markers.iter().map(String::as_str).collect();

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut raw: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw.push(
            record
                .iter()
                .map(|cell| (!markers.contains(cell)).then(|| cell.to_string()))
                .collect(),
        );
    }

    let types: Vec<ColumnType> = (0..columns.len())
        .map(|idx| {
            infer_column_type(
                raw.iter()
                    .filter_map(|row| row.get(idx).and_then(|c| c.as_deref())),
            )
        })
        .collect();

    let rows = raw
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(&types)
                .map(|(cell, ty)| match cell {
                    Some(text) => convert(text, *ty),
                    None => Value::Null,
                })
                .collect::<Vec<Value>>()
        })
        .collect();

    Table::with_rows(table_name, columns, rows)
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", path.display(), e)))
}

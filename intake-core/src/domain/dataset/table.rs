// intake-core/src/domain/dataset/table.rs

use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::domain::error::DomainError;

static NULL_VALUE: Value = Value::Null;

/// One row. Values are positional and aligned with the owning table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at `index`, `Null` when the index is out of range.
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }

    /// Key text of every value, `None` standing for null.
    pub fn key(&self) -> Vec<Option<String>> {
        self.values.iter().map(Value::key_text).collect()
    }

    /// Key text of the values at `indexes`; a missing index reads as null.
    pub fn key_at(&self, indexes: &[Option<usize>]) -> Vec<Option<String>> {
        indexes
            .iter()
            .map(|idx| idx.and_then(|i| self.get(i).key_text()))
            .collect()
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// A named, ordered collection of records sharing one column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table and checks every row against the column count.
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DomainError> {
        let mut table = Self::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, values: Vec<Value>) -> Result<(), DomainError> {
        if values.len() != self.columns.len() {
            return Err(DomainError::RowShape {
                table: self.name.clone(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(Record::new(values));
        Ok(())
    }

    /// Exact match first, then ASCII case-insensitive (warehouse catalogs and
    /// CSV headers do not always agree on case).
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(column))
            })
    }

    pub fn column_indexes(&self, columns: &[String]) -> Vec<Option<usize>> {
        columns.iter().map(|c| self.column_index(c)).collect()
    }

    /// Every value of `column`, in row order. Empty when the column is absent.
    pub fn column_values<'a>(&'a self, column: &str) -> Vec<&'a Value> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|r| r.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    /// Splits rows into (kept, removed) while preserving order on both sides.
    pub fn partition<F>(self, mut keep: F) -> (Table, Vec<Record>)
    where
        F: FnMut(&Record) -> bool,
    {
        let Table {
            name,
            columns,
            rows,
        } = self;
        let (kept, removed): (Vec<Record>, Vec<Record>) = rows.into_iter().partition(|r| keep(r));
        (
            Table {
                name,
                columns,
                rows: kept,
            },
            removed,
        )
    }

    /// Drops exact duplicate rows, keeping the first occurrence.
    pub fn dedup_rows(self) -> Table {
        let mut seen = std::collections::HashSet::new();
        let (kept, _) = self.partition(|r| seen.insert(r.key()));
        kept
    }
}

// intake-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::{Config, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// Imports Hexagonaux
use crate::domain::dataset::{Record, Value};
use crate::error::IntakeError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::warehouse::{Warehouse, quote_ident, quote_literal};

pub struct DuckDBWarehouse {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBWarehouse {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, IntakeError> {
        self.conn
            .lock()
            .map_err(|_| IntakeError::from(InfrastructureError::Database(DatabaseError::Poisoned)))
    }

    fn to_duckdb_param(value: &Value) -> duckdb::types::Value {
        match value {
            Value::Null => duckdb::types::Value::Null,
            Value::Bool(b) => duckdb::types::Value::Boolean(*b),
            Value::Int(i) => duckdb::types::Value::BigInt(*i),
            Value::Float(f) => duckdb::types::Value::Double(*f),
            Value::Text(s) => duckdb::types::Value::Text(s.clone()),
        }
    }

    /// Integers wider than i64 fall back to exact text when out of range.
    fn wide_int<T>(v: T) -> Value
    where
        T: TryInto<i64> + ToString + Copy,
    {
        match v.try_into() {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Text(v.to_string()),
        }
    }

    fn read_cell(row: &duckdb::Row, index: usize) -> Result<Value, duckdb::Error> {
        let value = match row.get_ref(index)? {
            ValueRef::Null => Value::Null,
            ValueRef::Boolean(v) => Value::Bool(v),
            ValueRef::TinyInt(v) => Value::Int(v as i64),
            ValueRef::SmallInt(v) => Value::Int(v as i64),
            ValueRef::Int(v) => Value::Int(v as i64),
            ValueRef::BigInt(v) => Value::Int(v),
            ValueRef::HugeInt(v) => Self::wide_int(v),
            ValueRef::UTinyInt(v) => Value::Int(v as i64),
            ValueRef::USmallInt(v) => Value::Int(v as i64),
            ValueRef::UInt(v) => Value::Int(v as i64),
            ValueRef::UBigInt(v) => Self::wide_int(v),
            ValueRef::Float(v) => Value::Float(v as f64),
            ValueRef::Double(v) => Value::Float(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).to_string()),
            ValueRef::Timestamp(unit, v) => {
                let micros = match unit {
                    TimeUnit::Second => v * 1_000_000,
                    TimeUnit::Millisecond => v * 1_000,
                    TimeUnit::Microsecond => v,
                    TimeUnit::Nanosecond => v / 1_000,
                };
                match chrono::DateTime::from_timestamp_micros(micros) {
                    Some(dt) => Value::Text(dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string()),
                    None => Value::Int(micros),
                }
            }
            ValueRef::Date32(days) => {
                match chrono::NaiveDate::from_num_days_from_ce_opt(719_163 + days) {
                    Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
                    None => Value::Int(days as i64),
                }
            }
            other => {
                debug!(column = index, "DuckDB type mapped to debug string");
                Value::Text(format!("{:?}", other))
            }
        };
        Ok(value)
    }
}

#[async_trait]
impl Warehouse for DuckDBWarehouse {
    async fn execute(&self, query: &str) -> Result<(), IntakeError> {
        let conn = self.lock()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, IntakeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let row = rows
            .next()?
            .ok_or_else(|| IntakeError::InternalError("No scalar value returned".into()))?;

        let value: i64 = row.get(0)?;
        u64::try_from(value)
            .map_err(|_| IntakeError::InternalError(format!("Negative scalar value: {}", value)))
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<Value>>, IntakeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows_iter = stmt.query([])?;

        let column_count = match rows_iter.as_ref() {
            Some(stmt_ref) => stmt_ref.column_count(),
            None => return Ok(Vec::new()),
        };

        let mut result = Vec::new();
        while let Some(row) = rows_iter.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(Self::read_cell(row, i)?);
            }
            result.push(values);
        }
        Ok(result)
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>, IntakeError> {
        let query = format!(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_name = {} ORDER BY ordinal_position",
            quote_literal(table)
        );
        let rows = self.fetch_rows(&query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.into_iter().next())
            .map(|v| v.to_string())
            .collect())
    }

    async fn insert_rows(
        &self,
        table: &str,
        columns: &[String],
        rows: &[Record],
    ) -> Result<u64, IntakeError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let column_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            column_list,
            placeholders
        );

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut written = 0u64;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                let params: Vec<duckdb::types::Value> = (0..columns.len())
                    .map(|i| Self::to_duckdb_param(row.get(i)))
                    .collect();
                let param_refs: Vec<&dyn duckdb::ToSql> = params
                    .iter()
                    .map(|v| v as &dyn duckdb::ToSql)
                    .collect();
                written += stmt.execute(param_refs.as_slice())? as u64;
            }
        }
        tx.commit()?;

        if written != rows.len() as u64 {
            warn!(table, expected = rows.len(), written, "Insert wrote an unexpected row count");
        }
        Ok(written)
    }

    async fn table_exists(&self, table: &str) -> Result<bool, IntakeError> {
        let query = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = {}",
            quote_literal(table)
        );
        Ok(self.query_scalar(&query).await? > 0)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

// intake-core/src/application/loader.rs

use serde::Serialize;
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

use crate::domain::dataset::{Dataset, Record, Table, Value};
use crate::domain::load::LoadPlan;
use crate::domain::schema::PrimaryKeyMap;
use crate::error::IntakeError;
use crate::ports::warehouse::{Warehouse, quote_ident};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Warehouse table was empty: every row went in.
    Initial { inserted: u64 },
    /// Only rows with unseen keys went in.
    Incremental { inserted: u64, existing: u64 },
    /// Every key already present, nothing written.
    UpToDate { existing: u64 },
    Skipped { reason: String },
    Failed { error: String },
}

impl LoadOutcome {
    pub fn inserted(&self) -> u64 {
        match self {
            LoadOutcome::Initial { inserted } | LoadOutcome::Incremental { inserted, .. } => *inserted,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableLoad {
    pub table: String,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub tables: Vec<TableLoad>,
}

impl LoadReport {
    pub fn inserted_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.outcome.inserted()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableLoad> {
        self.tables
            .iter()
            .filter(|t| matches!(t.outcome, LoadOutcome::Failed { .. }))
    }

    pub fn outcome(&self, table: &str) -> Option<&LoadOutcome> {
        self.tables.iter().find(|t| t.table == table).map(|t| &t.outcome)
    }

    fn record(&mut self, table: &str, outcome: LoadOutcome) {
        self.tables.push(TableLoad {
            table: table.to_string(),
            outcome,
        });
    }
}

/// Additive-only loader: rows are appended, never updated or deleted.
pub struct IncrementalLoader<'a> {
    warehouse: &'a dyn Warehouse,
    pk_map: &'a PrimaryKeyMap,
}

impl<'a> IncrementalLoader<'a> {
    pub fn new(warehouse: &'a dyn Warehouse, pk_map: &'a PrimaryKeyMap) -> Self {
        Self { warehouse, pk_map }
    }

    /// Loads the plan's tables in order. A failing table is recorded and the
    /// loader moves on to the next one.
    #[instrument(skip_all, fields(tables = plan.len()))]
    pub async fn load(&self, dataset: &Dataset, plan: &LoadPlan) -> LoadReport {
        let mut report = LoadReport::default();

        for name in dataset.table_names() {
            if !plan.contains(name) {
                warn!(table = name, "Table missing from load order, not loaded");
                report.record(
                    name,
                    LoadOutcome::Skipped {
                        reason: "not in load order".into(),
                    },
                );
            }
        }

        for name in plan.tables() {
            let Some(table) = dataset.get(name) else {
                continue;
            };
            let outcome = match self.load_table(table).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(table = %name, error = %e, "❌ Load failed");
                    LoadOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.record(name, outcome);
        }

        info!(inserted = report.inserted_rows(), "Load finished");
        report
    }

    pub async fn load_table(&self, table: &Table) -> Result<LoadOutcome, IntakeError> {
        let name = table.name();
        let existing = self
            .warehouse
            .query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)))
            .await?;

        if existing == 0 {
            let inserted = self.insert(table, table.rows()).await?;
            info!(table = name, inserted, "📥 Initial load");
            return Ok(LoadOutcome::Initial { inserted });
        }

        let Some(pk_cols) = self.pk_map.get(name) else {
            warn!(table = name, "No primary key on a non-empty table, cannot tell new rows apart");
            return Ok(LoadOutcome::Skipped {
                reason: "no primary key on non-empty table".into(),
            });
        };

        let known = self.existing_keys(name, pk_cols).await?;
        let indexes = table.column_indexes(pk_cols);
        let fresh: Vec<Record> = table
            .rows()
            .iter()
            .filter(|row| !known.contains(&row.key_at(&indexes)))
            .cloned()
            .collect();

        if fresh.is_empty() {
            info!(table = name, "✅ Up to date");
            return Ok(LoadOutcome::UpToDate { existing });
        }

        let inserted = self.insert(table, &fresh).await?;
        info!(table = name, inserted, existing, "📥 Incremental load");
        Ok(LoadOutcome::Incremental { inserted, existing })
    }

    async fn insert(&self, table: &Table, rows: &[Record]) -> Result<u64, IntakeError> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.warehouse
            .insert_rows(table.name(), table.columns(), rows)
            .await
    }

    /// Key tuples already in the warehouse. Columns are read in their native
    /// type and normalised with [`Value::key_text`], the same form the dataset
    /// side uses, so a stored DOUBLE `1037.0` matches an extracted `1037`.
    async fn existing_keys(
        &self,
        table: &str,
        pk_cols: &[String],
    ) -> Result<HashSet<Vec<Option<String>>>, IntakeError> {
        let select = pk_cols
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let rows = self
            .warehouse
            .fetch_rows(&format!("SELECT {} FROM {}", select, quote_ident(table)))
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.iter().map(Value::key_text).collect())
            .collect())
    }
}

// intake-core/src/application/extraction.rs

use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::dataset::{Dataset, Table, Value};
use crate::domain::error::DomainError;
use crate::domain::project::{ProjectConfig, SourcesConfig};
use crate::error::IntakeError;
use crate::infrastructure::flat_file::{list_csv_files, read_csv_table, table_name_for};
use crate::infrastructure::fs::resolve;
use crate::ports::page_source::PageSource;

/// How far the pagination of one remote resource got.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteFetch {
    pub resource: String,
    pub rows: usize,
    pub total_records: u64,
    /// Set when a page failed; the rows fetched before it are kept.
    pub error: Option<String>,
}

impl RemoteFetch {
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.rows as u64 >= self.total_records
    }
}

#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub dataset: Dataset,
    pub remote: Vec<RemoteFetch>,
    pub warnings: Vec<String>,
}

/// Every source of the project: the CSV folder first, then the remote
/// resources, which replace any CSV table of the same name. Extraction never
/// fails on a bad source; it degrades and records a warning.
#[instrument(skip_all)]
pub async fn extract_all(
    config: &ProjectConfig,
    project_dir: &Path,
    page_source: &dyn PageSource,
) -> Result<ExtractionReport, IntakeError> {
    let raw_dir = resolve(project_dir, &config.sources.raw_dir);
    let mut report = extract_csv_dir(&raw_dir, &config.sources);

    for resource in &config.remote.resources {
        let (table, fetch) = fetch_resource(page_source, resource, config.remote.page_size).await;
        if let Some(error) = &fetch.error {
            report
                .warnings
                .push(format!("remote '{}' stopped early: {}", resource, error));
        }
        if let Some(table) = table {
            if report.dataset.contains(resource) {
                info!(table = %resource, "Remote resource replaces CSV table");
            }
            report.dataset.insert(dedupe_if_listed(table, &config.sources));
        }
        report.remote.push(fetch);
    }

    info!(
        tables = report.dataset.len(),
        rows = report.dataset.total_rows(),
        "Extraction finished"
    );
    Ok(report)
}

/// Reads every `*.csv` directly under `dir`. A missing folder yields an empty
/// dataset; an unreadable file is skipped.
pub fn extract_csv_dir(dir: &Path, sources: &SourcesConfig) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    if !dir.is_dir() {
        warn!(dir = ?dir, "Raw data folder not found");
        report
            .warnings
            .push(format!("raw data folder not found: {}", dir.display()));
        return report;
    }

    let files = match list_csv_files(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "Cannot list raw data folder");
            report.warnings.push(format!("cannot list {}: {}", dir.display(), e));
            return report;
        }
    };

    for path in files {
        let Some(name) = table_name_for(&path) else {
            continue;
        };
        match read_csv_table(&path, &name, &sources.null_markers) {
            Ok(table) => {
                info!(table = %name, rows = table.len(), "📄 CSV extracted");
                report.dataset.insert(dedupe_if_listed(table, sources));
            }
            Err(e) => {
                warn!(file = ?path, error = %e, "Skipping unreadable CSV file");
                report
                    .warnings
                    .push(format!("skipped {}: {}", path.display(), e));
            }
        }
    }

    report
}

fn dedupe_if_listed(table: Table, sources: &SourcesConfig) -> Table {
    if !sources.dedupe.iter().any(|t| t == table.name()) {
        return table;
    }
    let before = table.len();
    let table = table.dedup_rows();
    if table.len() < before {
        info!(table = table.name(), dropped = before - table.len(), "Duplicate rows dropped");
    }
    table
}

/// Pages through one resource: a `limit=1` probe learns `total_records`,
/// then the offset advances by each page's size. An empty page ends the
/// loop early. A failing page stops the resource and keeps what was fetched;
/// a failing probe yields an empty table, so a same-named CSV never survives.
pub async fn fetch_resource(
    page_source: &dyn PageSource,
    resource: &str,
    page_size: usize,
) -> (Option<Table>, RemoteFetch) {
    let mut fetch = RemoteFetch {
        resource: resource.to_string(),
        rows: 0,
        total_records: 0,
        error: None,
    };

    let total = match page_source.fetch_page(resource, 0, 1).await {
        Ok(probe) => probe.total_records,
        Err(e) => {
            warn!(resource, error = %e, "Remote probe failed, resource left empty");
            fetch.error = Some(e.to_string());
            return (Some(Table::new(resource, Vec::new())), fetch);
        }
    };
    fetch.total_records = total;

    let mut objects: Vec<serde_json::Map<String, serde_json::Value>> = Vec::new();
    let mut offset: u64 = 0;
    let limit = page_size.max(1) as u64;

    while offset < total {
        match page_source.fetch_page(resource, offset, limit).await {
            Ok(page) if page.data.is_empty() => {
                warn!(resource, offset, total, "Empty page before the end, stopping");
                break;
            }
            Ok(page) => {
                offset += page.data.len() as u64;
                objects.extend(page.data);
                info!(resource, fetched = offset, total, "🌐 Page received");
            }
            Err(e) => {
                warn!(resource, offset, error = %e, "Page fetch failed, keeping partial data");
                fetch.error = Some(e.to_string());
                break;
            }
        }
    }

    fetch.rows = objects.len();
    match objects_to_table(resource, objects) {
        Ok(table) => (Some(table), fetch),
        Err(e) => {
            fetch.error = Some(e.to_string());
            (None, fetch)
        }
    }
}

/// Columns are the union of object keys in first-seen order; a key missing
/// from an object reads as null.
pub fn objects_to_table(
    name: &str,
    objects: Vec<serde_json::Map<String, serde_json::Value>>,
) -> Result<Table, DomainError> {
    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(name, columns.clone());
    for mut object in objects {
        let row: Vec<Value> = columns
            .iter()
            .map(|c| object.remove(c).map(Value::from).unwrap_or_default())
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::page_source::Page;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Serves `total` rows of `{"order_id": "o<i>"}`, optionally failing at
    /// one offset, and records every request.
    struct FakePages {
        total: u64,
        fail_at: Option<u64>,
        down: bool,
        requests: Mutex<Vec<(u64, u64)>>,
    }

    impl FakePages {
        fn new(total: u64, fail_at: Option<u64>) -> Self {
            Self {
                total,
                fail_at,
                down: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Every request fails, the probe included.
        fn unreachable() -> Self {
            Self {
                down: true,
                ..Self::new(0, None)
            }
        }
    }

    #[async_trait]
    impl PageSource for FakePages {
        async fn fetch_page(&self, _resource: &str, offset: u64, limit: u64) -> Result<Page, IntakeError> {
            self.requests.lock().unwrap().push((offset, limit));
            if self.down {
                return Err(IntakeError::InternalError("connection refused".into()));
            }
            if self.fail_at == Some(offset) && limit > 1 {
                return Err(IntakeError::InternalError("connection reset".into()));
            }
            let end = (offset + limit).min(self.total);
            let data = (offset..end)
                .map(|i| {
                    let mut obj = serde_json::Map::new();
                    obj.insert("order_id".into(), format!("o{i}").into());
                    obj
                })
                .collect();
            Ok(Page {
                data,
                total_records: self.total,
                offset,
                limit,
            })
        }
    }

    #[tokio::test]
    async fn test_pagination_fetches_every_row() -> Result<()> {
        let source = FakePages::new(25, None);

        let (table, fetch) = fetch_resource(&source, "order_payments", 10).await;

        assert_eq!(table.unwrap().len(), 25);
        assert!(fetch.is_complete());
        let requests = source.requests.lock().unwrap().clone();
        assert_eq!(requests, vec![(0, 1), (0, 10), (10, 10), (20, 10)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_page_keeps_partial_rows() -> Result<()> {
        let source = FakePages::new(25, Some(10));

        let (table, fetch) = fetch_resource(&source, "order_reviews", 10).await;

        assert_eq!(table.unwrap().len(), 10);
        assert_eq!(fetch.rows, 10);
        assert!(fetch.error.is_some());
        assert!(!fetch.is_complete());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_resource_yields_empty_table() -> Result<()> {
        let source = FakePages::new(0, None);
        let (table, fetch) = fetch_resource(&source, "order_reviews", 10).await;
        assert!(table.unwrap().is_empty());
        assert!(fetch.is_complete());
        Ok(())
    }

    #[test]
    fn test_objects_with_uneven_keys() {
        let objects: Vec<serde_json::Map<String, serde_json::Value>> = vec![
            serde_json::from_str(r#"{"order_id":"o1","payment_value":10.5}"#).unwrap(),
            serde_json::from_str(r#"{"order_id":"o2","payment_type":"boleto"}"#).unwrap(),
        ];

        let table = objects_to_table("order_payments", objects).unwrap();

        assert_eq!(table.columns().len(), 3);
        let idx = table.column_index("payment_type").unwrap();
        assert_eq!(table.rows()[0].get(idx), &Value::Null);
        assert_eq!(table.rows()[1].get(idx), &Value::from("boleto"));
    }

    #[test]
    fn test_csv_folder_with_dedupe() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("olist_geolocation_dataset.csv"),
            "zip,city\n1037,sao paulo\n1037,sao paulo\n1046,sao paulo\n",
        )?;
        fs::write(
            dir.path().join("olist_sellers_dataset.csv"),
            "seller_id,city\ns1,rio\ns1,rio\n",
        )?;
        fs::write(dir.path().join("olist_broken_dataset.csv"), "a,b\n1\n")?;

        let report = extract_csv_dir(dir.path(), &SourcesConfig::default());

        assert_eq!(report.dataset.get("geolocation").unwrap().len(), 2);
        // only listed tables are deduplicated
        assert_eq!(report.dataset.get("sellers").unwrap().len(), 2);
        assert!(!report.dataset.contains("broken"));
        assert_eq!(report.warnings.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_replaces_csv_table() -> Result<()> {
        let dir = tempdir()?;
        let raw = dir.path().join("data/raw");
        fs::create_dir_all(&raw)?;
        fs::write(raw.join("olist_order_payments_dataset.csv"), "order_id\nold\n")?;

        let mut config: ProjectConfig = serde_yaml::from_str("name: olist\n")?;
        config.remote.resources = vec!["order_payments".into()];
        config.remote.page_size = 2;
        let source = FakePages::new(3, None);

        let report = extract_all(&config, dir.path(), &source).await?;

        let payments = report.dataset.get("order_payments").unwrap();
        assert_eq!(payments.len(), 3);
        assert_eq!(payments.rows()[0].get(0), &Value::from("o0"));
        assert_eq!(report.remote.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_remote_empties_csv_table() -> Result<()> {
        let dir = tempdir()?;
        let raw = dir.path().join("data/raw");
        fs::create_dir_all(&raw)?;
        fs::write(
            raw.join("olist_order_payments_dataset.csv"),
            "order_id,payment_value\no1,10.5\no2,3.0\n",
        )?;

        let mut config: ProjectConfig = serde_yaml::from_str("name: olist\n")?;
        config.remote.resources = vec!["order_payments".into()];
        let source = FakePages::unreachable();

        let report = extract_all(&config, dir.path(), &source).await?;

        assert_eq!(report.dataset.get("order_payments").map(Table::len), Some(0));
        assert!(report.remote[0].error.is_some());
        assert_eq!(report.warnings.len(), 1);
        Ok(())
    }
}

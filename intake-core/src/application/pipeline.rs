// intake-core/src/application/pipeline.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::error::IntakeError;
use crate::ports::page_source::PageSource;
use crate::ports::warehouse::Warehouse;

// Application Services
use crate::application::discovery::discover_primary_keys;
use crate::application::extraction::{RemoteFetch, extract_all};
use crate::application::loader::{IncrementalLoader, LoadReport};
use crate::application::reconcile::reconcile_counts;

// Domain
use crate::domain::load::RecordCount;
use crate::domain::project::{LogsConfig, ProjectConfig};
use crate::domain::quality::QualityScanner;
use crate::domain::validation::{ForeignKeyValidator, PrimaryKeyValidator, affected_rows};

// Infrastructure
use crate::infrastructure::audit::AuditLogger;
use crate::infrastructure::fs::resolve;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Validate and scan without touching the warehouse.
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct RunResult {
    pub success: bool,
    pub dry_run: bool,
    pub duration_ms: u64,
    pub tables_extracted: usize,
    pub rows_extracted: usize,
    pub invalid_pk_rows: usize,
    pub invalid_fk_rows: usize,
    pub quality_issues: usize,
    pub rows_inserted: u64,
    pub remote: Vec<RemoteFetch>,
    pub load: LoadReport,
    pub record_counts: Vec<RecordCount>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Audit file locations for one run.
struct AuditPaths {
    record_counts: PathBuf,
    invalid_pks: PathBuf,
    invalid_fks: PathBuf,
    data_quality: PathBuf,
}

impl AuditPaths {
    fn new(project_dir: &Path, logs: &LogsConfig) -> Self {
        let dir = resolve(project_dir, &logs.dir);
        Self {
            record_counts: dir.join(&logs.record_counts),
            invalid_pks: dir.join(&logs.invalid_pks),
            invalid_fks: dir.join(&logs.invalid_fks),
            data_quality: dir.join(&logs.data_quality),
        }
    }
}

/// One full batch: discover, extract, validate, load, reconcile, scan.
///
/// Only an inconsistent configuration (cyclic graph, load order against the
/// graph), a failing catalog read or an unwritable audit file aborts the run.
/// Extraction and per-table load problems end up in the result instead.
#[instrument(skip_all, fields(project = %config.name, dry_run = options.dry_run))]
pub async fn run_pipeline(
    config: &ProjectConfig,
    project_dir: &Path,
    warehouse: &dyn Warehouse,
    page_source: &dyn PageSource,
    options: &RunOptions,
) -> Result<RunResult, IntakeError> {
    println!("🚀 Starting intake run for '{}'...", config.name);
    let start_time = std::time::Instant::now();

    // 1. PLAN (fails fast on a bad graph or load order)
    let graph = config.relationship_graph();
    config.load_plan(&[])?;
    let audit = AuditPaths::new(project_dir, &config.logs);

    // 2. DISCOVERY
    println!("🔎 Discovering primary keys...");
    let pk_map = discover_primary_keys(warehouse).await?;
    if pk_map.is_empty() {
        warn!("No primary keys declared in the warehouse");
    }

    // 3. EXTRACTION
    println!("📦 Extracting sources...");
    let extraction = extract_all(config, project_dir, page_source).await?;
    let mut warnings = extraction.warnings;
    let tables_extracted = extraction.dataset.len();
    let rows_extracted = extraction.dataset.total_rows();
    let expected_counts: BTreeMap<String, u64> = extraction.dataset.row_counts();
    let extracted_names: Vec<String> = expected_counts.keys().cloned().collect();
    let plan = config.load_plan(&extracted_names)?;
    println!(
        "   {} tables, {} rows extracted",
        tables_extracted, rows_extracted
    );

    // 4. PRIMARY KEYS
    println!("🔑 Validating primary keys...");
    let (dataset, pk_errors) = PrimaryKeyValidator::validate(extraction.dataset, &pk_map);
    AuditLogger::log_invalid_pks(&audit.invalid_pks, &pk_errors)?;
    let invalid_pk_rows = affected_rows(&pk_errors);

    // 5. FOREIGN KEYS
    println!("🔗 Validating foreign keys...");
    let (dataset, fk_errors) = ForeignKeyValidator::validate(dataset, &graph)?;
    AuditLogger::log_invalid_fks(&audit.invalid_fks, &fk_errors)?;
    let invalid_fk_rows = affected_rows(&fk_errors);

    // 6. LOAD + RECONCILE
    let mut load = LoadReport::default();
    let mut record_counts = Vec::new();
    if options.dry_run {
        println!("⏭️  Dry run: warehouse left untouched");
    } else {
        println!("📥 Loading warehouse...");
        load = IncrementalLoader::new(warehouse, &pk_map)
            .load(&dataset, &plan)
            .await;

        println!("🧮 Reconciling record counts...");
        record_counts = reconcile_counts(warehouse, &expected_counts).await;
        AuditLogger::log_record_counts(&audit.record_counts, &record_counts)?;
    }

    // 7. QUALITY
    println!("🩺 Scanning data quality...");
    let issues = QualityScanner::scan(&dataset, &config.quality);
    AuditLogger::log_data_quality(&audit.data_quality, &issues)?;

    let errors: Vec<String> = load
        .failures()
        .map(|t| format!("load of '{}' failed", t.table))
        .collect();
    warnings.extend(
        record_counts
            .iter()
            .filter(|c| !c.matches())
            .map(|c| format!("{}: expected {} records, found {}", c.table, c.expected, c.actual)),
    );

    let result = RunResult {
        success: errors.is_empty(),
        dry_run: options.dry_run,
        duration_ms: start_time.elapsed().as_millis() as u64,
        tables_extracted,
        rows_extracted,
        invalid_pk_rows,
        invalid_fk_rows,
        quality_issues: issues.len(),
        rows_inserted: load.inserted_rows(),
        remote: extraction.remote,
        load,
        record_counts,
        warnings,
        errors,
    };

    // 8. RESULTS
    let target_dir = resolve(project_dir, &config.target_path);
    save_json(&target_dir.join("run_results.json"), &result)?;

    info!(
        inserted = result.rows_inserted,
        invalid_pk = result.invalid_pk_rows,
        invalid_fk = result.invalid_fk_rows,
        issues = result.quality_issues,
        "Run finished"
    );
    println!("🏁 Run finished in {:.2?}", start_time.elapsed());
    Ok(result)
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), IntakeError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| IntakeError::InternalError(format!("Serialization: {}", e)))?;
    crate::infrastructure::fs::atomic_write(path, content)?;
    Ok(())
}

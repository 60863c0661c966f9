// intake-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::graph::{ForeignKey, RelationshipGraph};
use crate::domain::load::LoadPlan;
use crate::domain::quality::QualityConfig;

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[validate(nested)]
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub ddl_path: Option<String>,

    #[serde(default)]
    pub logs: LogsConfig,

    /// FK edges; the Olist graph when omitted.
    #[serde(default)]
    pub relationships: Option<Vec<ForeignKey>>,

    /// Curated load order; the Olist order when omitted and the Olist graph
    /// is in use, otherwise derived from the graph.
    #[serde(default)]
    pub load_order: Option<Vec<String>>,

    #[validate(nested)]
    #[serde(default)]
    pub quality: QualityConfig,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,
}

impl ProjectConfig {
    pub fn relationship_graph(&self) -> RelationshipGraph {
        match &self.relationships {
            Some(edges) => RelationshipGraph::new(edges.clone()),
            None => RelationshipGraph::olist(),
        }
    }

    /// `extra` are tables outside the graph (usually the extracted ones);
    /// a derived order appends them after the graph tables. An explicit or
    /// Olist order is taken as written.
    pub fn load_plan(&self, extra: &[String]) -> Result<LoadPlan, DomainError> {
        let graph = self.relationship_graph();
        match (&self.load_order, &self.relationships) {
            (Some(order), _) => LoadPlan::new(order.clone(), &graph),
            (None, None) => LoadPlan::new(LoadPlan::olist_order(), &graph),
            (None, Some(_)) => LoadPlan::derived(&graph, extra),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WarehouseConfig {
    /// DuckDB file relative to the project dir, or `:memory:`.
    #[serde(default = "default_warehouse_path")]
    pub path: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_raw_dir")]
    pub raw_dir: String,

    /// Tables whose exact duplicate rows are dropped at extraction.
    #[serde(default = "default_dedupe")]
    pub dedupe: Vec<String>,

    #[serde(default = "default_null_markers")]
    pub null_markers: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            dedupe: default_dedupe(),
            null_markers: default_null_markers(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_resources")]
    pub resources: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            resources: default_resources(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogsConfig {
    #[serde(default = "default_logs_dir")]
    pub dir: String,
    #[serde(default = "default_record_counts")]
    pub record_counts: String,
    #[serde(default = "default_invalid_pks")]
    pub invalid_pks: String,
    #[serde(default = "default_invalid_fks")]
    pub invalid_fks: String,
    #[serde(default = "default_data_quality")]
    pub data_quality: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            dir: default_logs_dir(),
            record_counts: default_record_counts(),
            invalid_pks: default_invalid_pks(),
            invalid_fks: default_invalid_fks(),
            data_quality: default_data_quality(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_warehouse_path() -> String {
    "warehouse.duckdb".to_string()
}
fn default_raw_dir() -> String {
    "data/raw".to_string()
}
fn default_dedupe() -> Vec<String> {
    vec!["geolocation".to_string()]
}
fn default_null_markers() -> Vec<String> {
    ["", "NA", "N/A", "NULL", "null", "NaN", "nan", "None"]
        .map(String::from)
        .to_vec()
}
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_page_size() -> usize {
    10_000
}
fn default_resources() -> Vec<String> {
    vec!["order_payments".to_string(), "order_reviews".to_string()]
}
fn default_logs_dir() -> String {
    "logs".to_string()
}
fn default_record_counts() -> String {
    "log_file.csv".to_string()
}
fn default_invalid_pks() -> String {
    "invalid_pks.csv".to_string()
}
fn default_invalid_fks() -> String {
    "invalid_fks.csv".to_string()
}
fn default_data_quality() -> String {
    "data_quality_issues.csv".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string(), "logs".to_string()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_minimal_config_gets_olist_defaults() -> Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("name: olist\n")?;

        assert_eq!(config.warehouse.path, "warehouse.duckdb");
        assert_eq!(config.remote.base_url, "http://localhost:8000");
        assert_eq!(config.remote.page_size, 10_000);
        assert_eq!(config.remote.resources, vec!["order_payments", "order_reviews"]);
        assert_eq!(config.sources.dedupe, vec!["geolocation"]);
        assert_eq!(config.logs.record_counts, "log_file.csv");
        assert_eq!(config.logs.data_quality, "data_quality_issues.csv");
        assert_eq!(config.clean_targets, vec!["target", "logs"]);
        assert_eq!(config.relationship_graph(), RelationshipGraph::olist());
        assert_eq!(config.load_plan(&[])?.tables(), LoadPlan::olist_order().as_slice());
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_custom_relationships_derive_load_order() -> Result<()> {
        let yaml = r#"
name: shop
relationships:
  - { child: lines, column: invoice_id, parent: invoices, parent_column: id }
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.load_plan(&[])?.tables(), ["invoices", "lines"]);
        Ok(())
    }

    #[test]
    fn test_derived_order_appends_tables_outside_graph() -> Result<()> {
        let yaml = r#"
name: shop
relationships:
  - { child: lines, column: invoice_id, parent: invoices, parent_column: id }
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        let extracted = vec!["invoices".to_string(), "lines".to_string(), "suppliers".to_string()];

        let plan = config.load_plan(&extracted)?;

        assert_eq!(plan.tables(), ["invoices", "lines", "suppliers"]);
        Ok(())
    }

    #[test]
    fn test_invalid_values_fail_validation() -> Result<()> {
        let yaml = r#"
name: ""
remote: { page_size: 0 }
quality:
  temporal:
    - { table: orders, columns: [a, b] }
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        let errors = config.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("remote"));
        assert!(fields.contains_key("quality"));
        Ok(())
    }
}

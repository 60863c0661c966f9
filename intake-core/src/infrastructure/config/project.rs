// intake-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["intake.yaml", "intake_project.yaml"];

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Locate the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Base YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config = parse_project_config(&content)?;

    // 3. Environment layering, e.g. INTAKE_WAREHOUSE_PATH=/tmp/wh.duckdb intake run
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    // 4. Fail fast on invalid values
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

pub fn parse_project_config(content: &str) -> Result<ProjectConfig, InfrastructureError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// `lookup` resolves a variable name to its value, if set.
pub fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("INTAKE_WAREHOUSE_PATH") {
        info!(old = ?config.warehouse.path, new = ?val, "Overriding warehouse path via ENV");
        config.warehouse.path = val;
    }
    if let Some(val) = lookup("INTAKE_API_URL") {
        info!(old = ?config.remote.base_url, new = ?val, "Overriding remote base URL via ENV");
        config.remote.base_url = val;
    }
    if let Some(val) = lookup("INTAKE_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
}

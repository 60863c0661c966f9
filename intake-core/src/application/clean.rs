// intake-core/src/application/clean.rs

use std::fs;
use std::path::Path;

use crate::domain::project::ProjectConfig;
use crate::error::IntakeError;
use crate::infrastructure::fs::contained_join;

/// Removes the configured clean targets. Returns the targets that existed.
pub fn clean_project(project_dir: &Path, config: &ProjectConfig) -> Result<Vec<String>, IntakeError> {
    tracing::info!("🧹 Initializing cleanup sequence...");

    let targets = if config.clean_targets.is_empty() {
        vec!["target".to_string()]
    } else {
        config.clean_targets.clone()
    };

    let mut removed = Vec::new();
    for target_rel_path in targets {
        // Path traversal guard
        let full_path = contained_join(project_dir, &target_rel_path)
            .ok_or_else(|| IntakeError::UnsafePath(target_rel_path.clone()))?;

        if full_path.exists() {
            if full_path.is_dir() {
                fs::remove_dir_all(&full_path)?;
            } else {
                fs::remove_file(&full_path)?;
            }
            println!("   🗑️  Artifact removed: {}", target_rel_path);
            removed.push(target_rel_path);
        }
    }

    Ok(removed)
}

// intake/src/commands/clean.rs
//
// USE CASE: Remove run artifacts.

use std::path::PathBuf;

use intake_core::application::clean_project;

use super::load_config;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    match clean_project(&project_dir, &config) {
        Ok(removed) if removed.is_empty() => println!("✨ Nothing to clean"),
        Ok(removed) => {
            for target in &removed {
                println!("🧹 Removed {}", target);
            }
        }
        Err(e) => {
            eprintln!("❌ Clean failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

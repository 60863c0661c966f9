// intake-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(intake::infra::database::duckdb),
        help("An error occurred inside the warehouse engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Warehouse connection lock poisoned")]
    #[diagnostic(code(intake::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(intake::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(intake::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(intake::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(intake::infra::config_missing))]
    ConfigNotFound(String),

    // --- FLAT FILES ---
    #[error("CSV Error: {0}")]
    #[diagnostic(
        code(intake::infra::csv),
        help("Check the delimiter and that every record has the header's width.")
    )]
    Csv(#[from] csv::Error),

    // --- REMOTE SOURCE ---
    #[error("HTTP Error: {0}")]
    #[diagnostic(
        code(intake::infra::http),
        help("Is the remote data endpoint running and reachable?")
    )]
    Http(#[from] reqwest::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(intake::infra::json))]
    Json(#[from] serde_json::Error),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

// intake-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    // --- DOMAIN ERRORS (graph, load plan, dataset shape) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (DB, IO, HTTP, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        IntakeError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for IntakeError {
    fn from(err: duckdb::Error) -> Self {
        IntakeError::Infrastructure(InfrastructureError::from(err))
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        IntakeError::Infrastructure(InfrastructureError::Csv(err))
    }
}

impl From<reqwest::Error> for IntakeError {
    fn from(err: reqwest::Error) -> Self {
        IntakeError::Infrastructure(InfrastructureError::Http(err))
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        IntakeError::Infrastructure(InfrastructureError::Json(err))
    }
}

// intake-core/src/application/mod.rs

pub mod bootstrap;
pub mod clean;
pub mod discovery;
pub mod extraction;
pub mod inspect;
pub mod loader;
pub mod pipeline;
pub mod reconcile;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs `use intake_core::application::{run_pipeline, clean_project, ...}`
// without knowing how the files are laid out.

pub use bootstrap::{BootstrapReport, bootstrap_from_file, bootstrap_schema};
pub use clean::clean_project;
pub use discovery::discover_primary_keys;
pub use extraction::{ExtractionReport, RemoteFetch, extract_all};
pub use inspect::{TableSample, inspect_table};
pub use loader::{IncrementalLoader, LoadOutcome, LoadReport, TableLoad};
pub use pipeline::{RunOptions, RunResult, run_pipeline};
pub use reconcile::reconcile_counts;

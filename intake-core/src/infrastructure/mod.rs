// intake-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod audit;
pub mod config;
pub mod ddl;
pub mod error;
pub mod flat_file;
pub mod fs;

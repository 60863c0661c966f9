// intake-core/src/domain/quality/mod.rs

pub mod config;
pub mod scanner;
pub mod timestamp;

pub use config::{QualityConfig, TemporalCheck};
pub use scanner::QualityScanner;

// intake-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the warehouse and the remote page source.
pub mod ports;

// 2. Domain (business core)
// Dataset model, validators, quality scans, dependency graph, load plan.
// Depends on NOTHING else (neither infra nor app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, HTTP pagination, CSV reader, audit CSV, DDL, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// Discovery, extraction, loading, reconciliation, pipeline.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::IntakeError;

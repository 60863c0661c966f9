pub mod dataset;
pub mod error;
pub mod graph;
pub mod load;
pub mod project;
pub mod quality;
pub mod schema;
pub mod validation;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;

// intake-core/src/domain/validation/mod.rs

pub mod foreign_key;
pub mod issue;
pub mod primary_key;

pub use foreign_key::ForeignKeyValidator;
pub use issue::{ErrorKind, ValidationError, affected_rows, aggregate};
pub use primary_key::PrimaryKeyValidator;

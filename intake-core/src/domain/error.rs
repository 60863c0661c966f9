// intake-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Circular dependency detected involving: {0}")]
    #[diagnostic(
        code(intake::domain::cycle),
        help("Check the `relationships` section: a table cannot (transitively) reference itself.")
    )]
    CircularDependency(String),

    #[error("Load order violation: '{child}' is loaded before its parent '{parent}'")]
    #[diagnostic(
        code(intake::domain::load_order),
        help("Every parent table must appear before its children in `load_order`.")
    )]
    LoadOrderViolation { child: String, parent: String },

    #[error("Row shape mismatch in '{table}': expected {expected} values, got {found}")]
    #[diagnostic(code(intake::domain::row_shape))]
    RowShape {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid relationship: {0}")]
    #[diagnostic(code(intake::domain::relationship))]
    InvalidRelationship(String),
}

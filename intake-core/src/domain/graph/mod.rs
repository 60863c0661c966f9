pub mod dag;
pub mod relationship;

pub use dag::GraphSolver;
pub use relationship::{ForeignKey, RelationshipGraph};

pub mod count;
pub mod plan;

pub use count::RecordCount;
pub use plan::LoadPlan;

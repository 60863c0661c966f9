pub mod page_source;
pub mod warehouse;

pub use page_source::{Page, PageSource};
pub use warehouse::Warehouse;

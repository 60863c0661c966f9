pub mod duckdb;
pub mod http;

pub use self::duckdb::DuckDBWarehouse;
pub use self::http::HttpPageSource;

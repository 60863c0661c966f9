pub mod configuration;

pub use configuration::{LogsConfig, ProjectConfig, RemoteConfig, SourcesConfig, WarehouseConfig};

// intake-core/src/ports/page_source.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// One page of a paginated read endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, resource: &str, offset: u64, limit: u64) -> Result<Page, IntakeError>;
}

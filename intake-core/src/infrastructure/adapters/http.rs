// intake-core/src/infrastructure/adapters/http.rs

use async_trait::async_trait;
use tracing::debug;

use crate::error::IntakeError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::page_source::{Page, PageSource};

/// Client for `GET {base_url}/{resource}?offset=..&limit=..`.
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn page_url(&self, resource: &str, offset: u64, limit: u64) -> String {
        format!(
            "{}/{}?offset={}&limit={}",
            self.base_url,
            resource.trim_matches('/'),
            offset,
            limit
        )
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, resource: &str, offset: u64, limit: u64) -> Result<Page, IntakeError> {
        let url = self.page_url(resource, offset, limit);
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(InfrastructureError::Http)?;

        let page: Page = response.json().await?;
        Ok(page)
    }
}

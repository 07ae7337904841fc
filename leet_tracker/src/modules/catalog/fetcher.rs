use crate::types::{
    catalog::CatalogResponse,
    error::{Result, TrackerError},
};
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Duration;
use url::Url;

/// Remote read-only endpoint serving the full problem catalog.
#[async_trait]
pub trait CatalogSource {
    async fn fetch(&self) -> Result<CatalogResponse>;
}

pub struct LeetCodeClient {
    url: Url,
    client: Client,
}

impl LeetCodeClient {
    pub fn new(catalog_url: &str) -> Result<Self> {
        let url = Url::parse(catalog_url)
            .map_err(|e| TrackerError::Validation(format!("invalid catalog url: {}", e)))?;

        Ok(LeetCodeClient {
            url,
            client: Client::builder()
                .gzip(true)
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap(),
        })
    }
}

#[async_trait]
impl CatalogSource for LeetCodeClient {
    async fn fetch(&self) -> Result<CatalogResponse> {
        tracing::info!("Attempting to get the problem catalog from {}", self.url);
        let res = self.client.get(self.url.clone()).send().await?;
        let catalog: CatalogResponse = res.error_for_status()?.json().await?;

        tracing::info!(
            "{} catalog entries retrieved ({} reported in total).",
            catalog.stat_status_pairs.len(),
            catalog.num_total
        );

        Ok(catalog)
    }
}

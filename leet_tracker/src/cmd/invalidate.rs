use anyhow::{Context, Result};
use clap::Args;
use leet_tracker::{
    config::Config,
    modules::catalog::{fetcher::LeetCodeClient, service::CatalogService},
};
use leet_tracker_libs::cache::RedisCache;

#[derive(Debug, Args)]
pub struct InvalidateArgs {}

pub async fn run(_args: InvalidateArgs) -> Result<()> {
    let config = Config::from_env()?;

    let cache = RedisCache::connect(&config.redis_url, config.cache_deadline)
        .await
        .with_context(|| {
            let message = "Failed to connect to the cache backend.";
            tracing::error!(message);
            message
        })?;
    let client = LeetCodeClient::new(&config.catalog_url)?;
    let service = CatalogService::new(client, cache, config.catalog_cache_ttl);

    service.invalidate_catalog().await?;

    Ok(())
}

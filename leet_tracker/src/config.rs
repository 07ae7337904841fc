use anyhow::{Context, Result};
use std::env;
use tokio::time::Duration;

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_CATALOG_URL: &str = "https://leetcode.com/api/problems/all/";

/// Runtime configuration, read from the environment exactly once at
/// startup and threaded through every constructor.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub catalog_url: String,
    pub max_connections: u32,
    /// How long a freshly fetched catalog stays cached.
    pub catalog_cache_ttl: Duration,
    /// Per-command budget for cache operations; an overrun reads as a miss.
    pub cache_deadline: Duration,
    pub ingest_batch_size: usize,
    pub ingest_workers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").with_context(|| {
            let message = "DATABASE_URL must be configured.";
            tracing::error!(message);
            message
        })?;
        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "REDIS_URL environment variable is not set. Default value `{}` will be used.",
                DEFAULT_REDIS_URL
            );
            String::from(DEFAULT_REDIS_URL)
        });
        let catalog_url = env::var("CATALOG_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "CATALOG_URL environment variable is not set. Default value `{}` will be used.",
                DEFAULT_CATALOG_URL
            );
            String::from(DEFAULT_CATALOG_URL)
        });

        Ok(Self {
            database_url,
            redis_url,
            catalog_url,
            max_connections: 5,
            catalog_cache_ttl: Duration::from_secs(24 * 60 * 60),
            cache_deadline: Duration::from_millis(500),
            ingest_batch_size: 100,
            ingest_workers: 4,
        })
    }
}

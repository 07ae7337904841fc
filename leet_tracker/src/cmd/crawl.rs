use anyhow::{Context, Result};
use clap::Args;
use leet_tracker::{
    config::Config,
    modules::{
        catalog::{
            fetcher::LeetCodeClient, ingest::IngestPipeline, service::CatalogService,
            store::PgProblemStore,
        },
        migration::MIGRATOR,
    },
};
use leet_tracker_libs::cache::RedisCache;
use sqlx::{postgres::Postgres, Pool};

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Evict the cached catalog first so this run always hits the source.
    #[arg(long)]
    fresh: bool,
}

pub async fn run(args: CrawlArgs) -> Result<()> {
    let config = Config::from_env()?;

    let pool: Pool<Postgres> = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    MIGRATOR.run(&pool).await?;

    let cache = RedisCache::connect(&config.redis_url, config.cache_deadline)
        .await
        .with_context(|| {
            let message = "Failed to connect to the cache backend.";
            tracing::error!(message);
            message
        })?;
    let client = LeetCodeClient::new(&config.catalog_url)?;
    let service = CatalogService::new(client, cache, config.catalog_cache_ttl);

    if args.fresh {
        service.invalidate_catalog().await?;
    }

    let problems = service.fetch_catalog().await?;

    let pipeline = IngestPipeline::new(
        PgProblemStore::new(pool.clone()),
        config.ingest_batch_size,
        config.ingest_workers,
    );
    pipeline.run(problems).await?;

    Ok(())
}

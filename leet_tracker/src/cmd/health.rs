use anyhow::{Context, Result};
use clap::Args;
use leet_tracker::{config::Config, modules::health};
use sqlx::{postgres::Postgres, Pool};

#[derive(Debug, Args)]
pub struct HealthArgs {}

pub async fn run(_args: HealthArgs) -> Result<()> {
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

    let report = health::check(&pool).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

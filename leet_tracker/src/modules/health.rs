use serde::Serialize;
use sqlx::{postgres::Postgres, Pool};
use tokio::time::{timeout, Duration};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub message: String,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Pings the database under a one second deadline and reports connection
/// pool statistics. Pool sizing itself is owned by the composing layer.
pub async fn check(pool: &Pool<Postgres>) -> HealthReport {
    let ping = timeout(Duration::from_secs(1), sqlx::query("SELECT 1").execute(pool)).await;

    let (status, mut message) = match ping {
        Ok(Ok(_)) => ("up", String::from("database reachable")),
        Ok(Err(e)) => ("down", format!("database error: {}", e)),
        Err(_) => ("down", String::from("database ping timed out")),
    };

    let pool_size = pool.size();
    let idle_connections = pool.num_idle();
    if status == "up" && pool_size > 0 && idle_connections == 0 {
        message = String::from("database reachable, but the connection pool is fully in use");
    }

    HealthReport {
        status,
        message,
        pool_size,
        idle_connections,
    }
}

use anyhow::Context;
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

pub type ConnectionPool = Pool<Postgres>;

/// Owns the lifecycle of the one pool a service holds for its whole life:
/// opened once at startup, closed once at shutdown.
pub struct ConnectionManager;

impl ConnectionManager {
    pub async fn new_pool(
        connection_string: &str,
        min_connections: u32,
        max_connections: u32,
    ) -> anyhow::Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .min_connections(min_connections)
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(connection_string)
            .await
            .context("Failed to create database connection pool")?;

        info!("🗄️ Connected to the database (min={min_connections}, max={max_connections})");

        Ok(pool)
    }

    pub async fn close(pool: &ConnectionPool) {
        pool.close().await;
        info!("🗄️ Database connection pool closed");
    }
}

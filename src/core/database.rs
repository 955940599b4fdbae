use crate::core::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Runs embedded migrations over the direct (non-pooled) connection.
///
/// Transaction poolers in front of `DATABASE_URL` do not support the
/// advisory locks sqlx takes while migrating.
pub async fn run_migrations(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
    let direct = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.direct_url)
        .await?;

    sqlx::migrate!("./migrations").run(&direct).await?;
    direct.close().await;
    Ok(())
}

/// Host part of a connection string, safe to log
pub fn display_host(url: &str) -> &str {
    url.rsplit('@').next().unwrap_or("***")
}

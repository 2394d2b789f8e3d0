//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit bounds. A pool is only handed out after a
//! liveness probe succeeds within `acquire_timeout`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::error::DbError;
use super::MIGRATOR;

/// Pool bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    /// Also bounds the startup probe
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(5 * 60),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a PostgreSQL connection pool and verify it answers.
///
/// # Errors
///
/// Returns `DbError::Unreachable` if the URL is rejected, no connection can be
/// made, or `SELECT 1` does not complete within `acquire_timeout`. There is no
/// retry.
///
/// # Example
///
/// ```ignore
/// let pool = connect("postgres://localhost/salesagency", &PoolConfig::default()).await?;
/// ```
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(database_url)
        .map_err(|e| DbError::Unreachable {
            reason: e.to_string(),
        })?;

    probe(&pool, config.acquire_timeout).await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Run `SELECT 1` bounded by `timeout`.
pub async fn probe(pool: &PgPool, timeout: Duration) -> Result<(), DbError> {
    let ping = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool);
    match tokio::time::timeout(timeout, ping).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(DbError::Unreachable {
            reason: e.to_string(),
        }),
        Err(_) => Err(DbError::Unreachable {
            reason: format!("liveness probe timed out after {:?}", timeout),
        }),
    }
}

/// Drain and close every connection.
pub async fn close(pool: &PgPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}

/// Apply bundled migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Connect the process-wide pool and run pending migrations.
/// Called once at startup; connection settings come from DATABASE_URL.
pub async fn connect() -> Result<PgPool, DbError> {
    let pool = POOL
        .get_or_try_init(|| async {
            let url = std::env::var("DATABASE_URL")
                .map_err(|_| DbError::ConfigMissing("DATABASE_URL"))?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            info!("connected to database");
            Ok::<_, DbError>(pool)
        })
        .await?;

    Ok(pool.clone())
}

/// Get the connected pool. Panics if `connect` has not run; handlers only
/// execute after startup so this is an invariant, not a runtime condition.
pub fn pool() -> &'static PgPool {
    POOL.get().expect("database pool not initialized")
}

/// Pings the pool to ensure connectivity
pub async fn health_check() -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool()).await?;
    Ok(())
}

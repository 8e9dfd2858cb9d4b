use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

pub mod models;
pub mod query_builder;
pub mod requests;
pub mod users;

/// Errors from the database layer.
///
/// The not-found and duplicate variants are domain errors callers map to
/// 4xx responses; everything else surfaces as an internal failure.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("no request with id '{0}'")]
    RequestNotFound(String),

    #[error("no document for request '{0}'")]
    FileNotFound(String),

    #[error("no user named '{0}'")]
    UserNotFound(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get the process-wide connection pool, creating it on first use.
pub async fn pool() -> Result<PgPool, DatabaseError> {
    POOL.get_or_try_init(connect).await.cloned()
}

async fn connect() -> Result<PgPool, DatabaseError> {
    let raw_url = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
    url::Url::parse(&raw_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

    let db_config = &config::config().database;
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout_secs))
        .connect(&raw_url)
        .await?;

    info!("Created database pool");
    Ok(pool)
}

/// Apply pending schema migrations.
pub async fn migrate() -> Result<(), DatabaseError> {
    let pool = pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check() -> Result<(), DatabaseError> {
    let pool = pool().await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(())
}

/// Postgres unique-violation, used to turn constraint errors into domain
/// conflicts instead of opaque 500s.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

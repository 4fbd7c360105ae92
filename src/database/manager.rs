use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connect to database error: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("can't create table: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Idempotent DDL for the single table this service owns
pub const CREATE_EXPENSES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id SERIAL PRIMARY KEY,
        title TEXT,
        amount FLOAT,
        note TEXT,
        tags TEXT[]
    )
"#;

/// Builds and tears down the process-wide connection pool.
/// The pool itself is handed to the repository; nothing here is global.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the pool and verify connectivity with one connection
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout())
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connect)?;

        info!(
            "Created database pool for {} (max_connections={})",
            config.redacted_url(),
            config.max_connections
        );
        Ok(pool)
    }

    /// Create the expenses table if it does not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_EXPENSES_TABLE)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;

        info!("create table success");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}

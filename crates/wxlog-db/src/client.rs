//! Database client and connection management

use crate::schema::CREATE_TEMPERATURES;
use crate::{StorageError, StorageResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Database client wrapping an sqlx SQLite pool
#[derive(Clone)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    /// Open (creating if missing) the database file and ensure the schema exists
    pub async fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(opts)
            .await?;

        let client = Self { pool };
        client.init_schema().await?;
        info!(path = %path.as_ref().display(), "temperature log opened");
        Ok(client)
    }

    /// Private in-memory database, mainly for tests
    pub async fn in_memory() -> StorageResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        // every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        let client = Self { pool };
        client.init_schema().await?;
        Ok(client)
    }

    /// Idempotent schema creation
    pub async fn init_schema(&self) -> StorageResult<()> {
        sqlx::query(CREATE_TEMPERATURES).execute(&self.pool).await?;
        Ok(())
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");

        let client = DbClient::open(&path).await.unwrap();
        client.ping().await.unwrap();
        assert!(path.exists());
        client.close().await;
    }

    #[tokio::test]
    async fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.db");

        let client = DbClient::open(&path).await.unwrap();
        client.init_schema().await.unwrap();
        client.close().await;

        let client = DbClient::open(&path).await.unwrap();
        client.ping().await.unwrap();
    }
}

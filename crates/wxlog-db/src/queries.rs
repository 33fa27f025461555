//! Query operations on the temperatures table

use crate::schema::SavedTemperature;
use crate::{DbClient, StorageResult};
use sqlx::Row;
use tracing::{debug, instrument};

impl DbClient {
    /// Append one snapshot; returns the assigned id
    #[instrument(skip(self))]
    pub async fn append(&self, temperature: f64, timestamp: &str) -> StorageResult<i64> {
        let result = sqlx::query("INSERT INTO temperatures (temperature, timestamp) VALUES (?, ?)")
            .bind(temperature)
            .bind(timestamp)
            .execute(self.pool())
            .await?;

        let id = result.last_insert_rowid();
        debug!(id, "saved temperature");
        Ok(id)
    }

    /// The `limit` most recently appended rows, newest first
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: u32) -> StorageResult<Vec<SavedTemperature>> {
        let rows = sqlx::query_as::<_, SavedTemperature>(
            r#"
            SELECT id, temperature, timestamp FROM temperatures
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        debug!("Retrieved {} saved temperatures", rows.len());
        Ok(rows)
    }

    /// Number of saved rows
    #[instrument(skip(self))]
    pub async fn count(&self) -> StorageResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM temperatures")
            .fetch_one(self.pool())
            .await?;

        Ok(row.get("count"))
    }
}

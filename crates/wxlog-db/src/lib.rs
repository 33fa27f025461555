//! Persistence log for saved temperature snapshots
//!
//! A single append-only SQLite table. The schema is created on open with
//! `CREATE TABLE IF NOT EXISTS`; there are no migrations.

pub mod client;
pub mod queries;
pub mod schema;

pub use client::*;
pub use schema::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

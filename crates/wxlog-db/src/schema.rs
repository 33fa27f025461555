//! Table layout for saved temperatures

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted snapshot of the latest reading
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct SavedTemperature {
    /// Autoincrement key; insertion order
    pub id: i64,
    pub temperature: f64,
    /// Upstream `YYYY-MM-DDTHH:MM` text, stored as received
    pub timestamp: String,
}

pub const CREATE_TEMPERATURES: &str = r#"
CREATE TABLE IF NOT EXISTS temperatures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    temperature REAL,
    timestamp TEXT
)
"#;

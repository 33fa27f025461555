use chrono::NaiveDate;

use crate::Reading;

/// Failure fetching readings from the upstream forecast service
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpstreamError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Mismatched hourly series: {times} timestamps, {temperatures} temperatures")]
    MismatchedSeries { times: usize, temperatures: usize },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Anything that can produce hourly readings for an inclusive date range
#[async_trait::async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Reading>, UpstreamError>;
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use wxlog_core::{EmptyInputError, UpstreamError};
use wxlog_db::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("upstream: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("history: {0}")]
    Aggregate(#[from] EmptyInputError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("no weather reading available yet")]
    NoReading,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoReading => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

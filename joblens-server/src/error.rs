use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use joblens::JoblensError;
use serde_json::json;
use thiserror::Error;

/// Error surface of the HTTP API. Rendered as `{error, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller mistake, e.g. a missing or blank `query`.
    #[error("{0}")]
    BadRequest(String),
    /// Anything the aggregation could not absorb.
    #[error("{0}")]
    Internal(String),
}

impl From<JoblensError> for ApiError {
    fn from(e: JoblensError) -> Self {
        match e {
            JoblensError::InvalidArg(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch analytics data",
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({ "error": error, "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

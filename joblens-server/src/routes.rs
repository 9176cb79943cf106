use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use joblens::Joblens;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// `GET /analytics?query=...`
#[tracing::instrument(skip(joblens))]
pub async fn analytics(
    State(joblens): State<Arc<Joblens>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Response, ApiError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("query is required".into()))?;

    let report = joblens.analytics(query).await?;
    if !report.warnings.is_empty() {
        tracing::warn!(
            query,
            warnings = report.warnings.len(),
            "report built with upstream failures"
        );
    }
    Ok(Json(&*report).into_response())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "JobLens server is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

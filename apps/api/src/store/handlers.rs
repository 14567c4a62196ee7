use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::tracking::{ApplicationRecord, QueryHistoryEntry};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkAppliedRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub link: String,
    /// Defaults to now.
    pub applied_at: Option<DateTime<Utc>>,
}

/// GET /api/v1/history
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<QueryHistoryEntry>>, AppError> {
    Ok(Json(state.store.query_history().await?))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationRecord>>, AppError> {
    Ok(Json(state.store.applications().await?))
}

/// PUT /api/v1/applications/:job_id
pub async fn handle_mark_applied(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    AppJson(req): AppJson<MarkAppliedRequest>,
) -> Result<Json<ApplicationRecord>, AppError> {
    let job_id = job_id.trim().to_string();
    if job_id.is_empty() {
        return Err(AppError::Validation("job id cannot be empty".to_string()));
    }

    let record = ApplicationRecord {
        job_id,
        title: req.title,
        company_name: req.company_name,
        link: req.link,
        applied_at: req.applied_at.unwrap_or_else(Utc::now),
    };
    state.store.mark_applied(record.clone()).await?;
    info!("Marked job {} as applied", record.job_id);

    Ok(Json(record))
}

/// DELETE /api/v1/applications/:job_id
pub async fn handle_unmark_applied(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.unmark_applied(&job_id).await? {
        return Err(AppError::NotFound(format!("No application for job {job_id}")));
    }
    info!("Removed application for job {job_id}");
    Ok(StatusCode::NO_CONTENT)
}

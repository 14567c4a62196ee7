//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::matching::engine::{explain, filter, ScoreBreakdown, MAX_FUSED_SCORE};
use crate::matching::sort::{NoneApplied, ResultSet, SortKey, SortState};
use crate::models::job::{JobRecord, ScoredRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub records: Vec<JobRecord>,
    pub query: String,
    pub threshold: Option<f64>,
    /// Drop jobs already marked as applied in the tracking store.
    #[serde(default)]
    pub exclude_applied: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultSetResponse {
    pub result_id: Uuid,
    pub query: String,
    pub threshold: f64,
    pub matched: usize,
    pub sort: Option<SortState>,
    pub results: Vec<ScoredRecord>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub total_records: usize,
    #[serde(flatten)]
    pub result_set: ResultSetResponse,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub record: JobRecord,
    pub query: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/filter
///
/// Scores the posted corpus against the query, keeps matches ranked by score,
/// and stores the result set so it can be re-sorted or exported later.
///
/// `threshold` is compared against the fused score, which is the best
/// weighted channel rather than a [0, 1] similarity: an exact title hit
/// scores 1.6 and the ceiling is 2.0. Accepted range is therefore
/// `0.0..=2.0`; omitted means `DEFAULT_THRESHOLD` (0.3).
pub async fn handle_filter(
    State(state): State<AppState>,
    AppJson(request): AppJson<FilterRequest>,
) -> Result<Json<FilterResponse>, AppError> {
    let query = validate_query(&request.query)?;
    let threshold = validate_threshold(request.threshold.unwrap_or(state.config.default_threshold))?;
    let total_records = request.records.len();

    let scored = {
        let query = query.clone();
        let records = request.records;
        tokio::task::spawn_blocking(move || filter(&records, &query, threshold))
            .await
            .map_err(|e| AppError::Internal(e.into()))?
    };

    let mut result_set = ResultSet::new(query.clone(), threshold, scored);
    if request.exclude_applied {
        let applied = state.store.applied_ids().await?;
        result_set.retain_unapplied(&applied);
    }

    if let Err(e) = state.store.record_query(&query).await {
        warn!("Failed to record query history: {e:#}");
    }

    if result_set.is_empty() {
        info!("No match among {total_records} jobs for '{query}' (threshold {threshold})");
    } else {
        info!(
            "Filtered {total_records} jobs for '{query}' (threshold {threshold}): {} matches",
            result_set.len()
        );
    }

    let response = {
        let mut cache = state.results.write().await;
        let id = cache.insert(result_set);
        debug!("{} result sets cached", cache.len());
        let set = cache
            .get(&id)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("result set {id} evicted on insert")))?;
        to_response(id, set)
    };

    Ok(Json(FilterResponse {
        total_records,
        result_set: response,
    }))
}

/// GET /api/v1/jobs/results/:id
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultSetResponse>, AppError> {
    let cache = state.results.read().await;
    let set = cache.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(to_response(id, set)))
}

/// POST /api/v1/jobs/results/:id/sort
///
/// Re-sorts a stored result set. Repeating the active key flips direction.
pub async fn handle_sort(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<SortRequest>,
) -> Result<Json<ResultSetResponse>, AppError> {
    // Only the applied column needs the store; fetch before taking the write lock.
    let applied = match request.key {
        SortKey::Applied => Some(state.store.applied_ids().await?),
        _ => None,
    };

    let mut cache = state.results.write().await;
    let set = cache.get_mut(&id).ok_or_else(|| not_found(id))?;
    let sort = match &applied {
        Some(ids) => set.sort_by(request.key, ids),
        None => set.sort_by(request.key, &NoneApplied),
    };
    info!("Result set {id} sorted by {} ({:?})", sort.key, sort.direction);

    Ok(Json(to_response(id, set)))
}

/// GET /api/v1/jobs/results/:id/export
///
/// The result set's records in current order with `similarityScore` stripped.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JobRecord>>, AppError> {
    let cache = state.results.read().await;
    let set = cache.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Json(set.export()))
}

/// POST /api/v1/jobs/explain
///
/// Per-channel breakdown of one record's score for a query.
pub async fn handle_explain(
    AppJson(request): AppJson<ExplainRequest>,
) -> Result<Json<ScoreBreakdown>, AppError> {
    let query = validate_query(&request.query)?;
    Ok(Json(explain(&request.record, &query)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn validate_query(raw: &str) -> Result<String, AppError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    Ok(query.to_string())
}

fn validate_threshold(threshold: f64) -> Result<f64, AppError> {
    if !threshold.is_finite() || !(0.0..=MAX_FUSED_SCORE).contains(&threshold) {
        return Err(AppError::Validation(format!(
            "threshold must be between 0.0 and {MAX_FUSED_SCORE} (fused scores are weighted and can exceed 1.0), got {threshold}"
        )));
    }
    Ok(threshold)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Result set {id} not found"))
}

fn to_response(id: Uuid, set: &ResultSet) -> ResultSetResponse {
    ResultSetResponse {
        result_id: id,
        query: set.query().to_string(),
        threshold: set.threshold(),
        matched: set.len(),
        sort: set.sort_state(),
        results: set.to_records(),
    }
}

//! Axum route handlers for the Résumé API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::ingest::acquisition::acquire_text;
use crate::models::job::{JobRecord, ScoredRecord};
use crate::resume::extractor::{ResumeExtractor, ResumeProfile};
use crate::resume::fit::{FitBreakdown, FitScorer};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_title: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub score: f64,
    pub breakdown: FitBreakdown,
    pub matching_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub resume_text: String,
    pub records: Vec<JobRecord>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub profile: ResumeProfile,
    pub results: Vec<ScoredRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract
///
/// Extracts a profile from plain résumé text. Empty text yields an empty profile.
pub async fn handle_extract(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExtractRequest>,
) -> Result<Json<ResumeProfile>, AppError> {
    let profile = ResumeExtractor::new(state.vocab).extract(&request.text);
    Ok(Json(profile))
}

/// POST /api/v1/resume/upload
///
/// Multipart upload with a `file` part (PDF or TXT). The text is extracted
/// from the document and run through the same profile extraction.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeProfile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("file part is missing a file name".to_string()))?;
        let bytes: Bytes = field.bytes().await?;

        if bytes.len() > state.config.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{file_name} is {} bytes; limit is {}",
                bytes.len(),
                state.config.max_upload_bytes
            )));
        }

        let text = tokio::task::spawn_blocking(move || acquire_text(&file_name, &bytes))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        let profile = ResumeExtractor::new(state.vocab).extract(&text);
        info!(
            "Parsed uploaded résumé: {} words, {} skills, {} years",
            profile.word_count,
            profile.skills.len(),
            profile.experience_years
        );
        return Ok(Json(profile));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' part".to_string(),
    ))
}

/// POST /api/v1/resume/match
///
/// Fit of one résumé against one job posting, with the skills they share.
pub async fn handle_match(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let profile = ResumeExtractor::new(state.vocab).extract(&request.resume_text);
    let scorer = FitScorer::new(state.vocab);

    let breakdown = scorer.breakdown(&profile, &request.job_description, &request.job_title);
    let matching_skills = scorer.matching_skills(&profile, &request.job_description);

    Ok(Json(MatchResponse {
        score: breakdown.overall,
        breakdown,
        matching_skills,
    }))
}

/// POST /api/v1/resume/rank
///
/// Ranks a corpus of job records by fit with the résumé, best first.
pub async fn handle_rank(
    State(state): State<AppState>,
    AppJson(request): AppJson<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let vocab = state.vocab;
    let total = request.records.len();

    let (profile, results) = tokio::task::spawn_blocking(move || {
        let profile = ResumeExtractor::new(vocab).extract(&request.resume_text);
        let results = FitScorer::new(vocab).rank(&profile, &request.records);
        (profile, results)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    info!("Ranked {total} jobs by résumé fit");
    Ok(Json(RankResponse { profile, results }))
}

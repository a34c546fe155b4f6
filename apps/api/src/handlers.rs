//! Axum route handlers for ingestion, querying, and taxonomy inspection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::coordinator::{BatchItemOutcome, IngestOutcome};
use crate::errors::AppError;
use crate::rank::RankedResult;
use crate::state::AppState;
use crate::store::{CandidateRow, NewCandidate};
use crate::taxonomy::Category;

#[derive(Debug, Deserialize)]
pub struct BatchIngestRequest {
    pub candidates: Vec<NewCandidate>,
}

#[derive(Debug, Serialize)]
pub struct BatchIngestResponse {
    pub outcomes: Vec<BatchItemOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub candidates: i64,
}

/// POST /api/v1/candidates
///
/// Classifies one candidate profile and inserts it into the matching
/// partition. 409 when the identifier already exists anywhere.
pub async fn handle_ingest_candidate(
    State(state): State<AppState>,
    Json(candidate): Json<NewCandidate>,
) -> Result<(StatusCode, Json<IngestOutcome>), AppError> {
    let outcome = state.coordinator.ingest_candidate(&candidate).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/v1/candidates/batch
///
/// Ingests a batch with per-record outcomes; a single bad record never
/// aborts the rest of the batch.
pub async fn handle_ingest_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchIngestRequest>,
) -> Result<Json<BatchIngestResponse>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::InvalidInput(
            "Batch contains no candidates".to_string(),
        ));
    }
    let outcomes = state.coordinator.ingest_batch(&request.candidates).await;
    Ok(Json(BatchIngestResponse { outcomes }))
}

/// POST /api/v1/rank
///
/// The query entry point: classify the JD, fetch the category's partition,
/// return the full descending ranking. Top-K truncation is the caller's
/// concern.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankedResult>, AppError> {
    let result = state
        .coordinator
        .rank_candidates_for_jd(&request.jd_text)
        .await?;
    Ok(Json(result))
}

/// GET /api/v1/categories
///
/// The fixed taxonomy with per-partition candidate counts.
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryInfo>>, AppError> {
    let counts = state.store.partition_counts().await?;
    let infos = Category::ALL
        .into_iter()
        .map(|category| CategoryInfo {
            key: category.key(),
            name: category.name(),
            description: category.description(),
            candidates: counts
                .iter()
                .find(|(key, _)| key == category.key())
                .map(|(_, n)| *n)
                .unwrap_or(0),
        })
        .collect();
    Ok(Json(infos))
}

/// GET /api/v1/candidates/:category
///
/// Returns a category's full partition in insertion order. 404 for a key
/// outside the taxonomy.
pub async fn handle_fetch_partition(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    let category: Category = category.parse()?;
    let partition = state.store.fetch_partition(category).await?;
    Ok(Json(partition))
}

//! Route handler functions.
//!
//! Each handler extracts its input via axum extractors, calls into the
//! retriever held by AppState, and returns JSON. Handlers never mutate
//! state; the retriever is read-only after startup.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use concord_core::types::ScoredVerse;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// Body of `POST /analyze`.
///
/// A missing `text` field degenerates to the empty string rather than a
/// validation error; the service always responds. An empty query embeds like
/// any other under the dense strategy.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    /// Maximum result count; defaults to the configured value, capped at the
    /// configured maximum.
    pub k: Option<usize>,
}

/// Response of `POST /analyze`: passages ascending by score (lower = more
/// relevant, distance semantics).
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub matches: Vec<ScoredVerse>,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub corpus_size: usize,
    pub strategy: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /analyze - retrieve passages related to the submitted text.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let k = request
        .k
        .unwrap_or(state.config.search.default_k)
        .min(state.config.search.max_k);

    let matches = state.retriever.retrieve(&request.text, k).await?;

    debug!(
        query_len = request.text.len(),
        k,
        returned = matches.len(),
        "Analyze request served"
    );

    Ok(Json(AnalyzeResponse { matches }))
}

/// GET /health - fixed status payload, no side effects.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        corpus_size: state.corpus_size,
        strategy: state.retriever.strategy().as_str().to_string(),
    })
}

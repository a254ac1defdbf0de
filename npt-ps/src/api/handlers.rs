//! Search endpoint handlers
//!
//! All four endpoints take `query` plus an optional `rows` (default 10).
//! An empty result set is a normal 200 answer with zero results, not an
//! error; only a malformed request or an unreachable index fails.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::search::{self, CitationResults, CitedField, PaperHit, SentenceHit};
use crate::state::AppState;

const DEFAULT_ROWS: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub rows: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CitationParams {
    pub query: String,
    pub rows: Option<u32>,
    /// `paper` (cited title, default) or `author` (cited author names)
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SentenceSearchResponse {
    pub query: String,
    pub num_results: usize,
    pub results: Vec<SentenceHit>,
}

#[derive(Debug, Serialize)]
pub struct PaperSearchResponse {
    pub query: String,
    pub num_results: usize,
    pub results: Vec<PaperHit>,
}

fn checked_query(raw: &str) -> ApiResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("empty query".to_string()));
    }
    Ok(trimmed)
}

/// GET /api/search/phrase
pub async fn phrase_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SentenceSearchResponse>> {
    let query = checked_query(&params.query)?;
    let rows = params.rows.unwrap_or(DEFAULT_ROWS);
    let results = search::search_sentences(&state.client, query, rows).await?;
    info!(query, hits = results.len(), "phrase search");
    Ok(Json(SentenceSearchResponse {
        query: query.to_string(),
        num_results: results.len(),
        results,
    }))
}

/// GET /api/search/title
pub async fn title_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PaperSearchResponse>> {
    let query = checked_query(&params.query)?;
    let rows = params.rows.unwrap_or(DEFAULT_ROWS);
    let results = search::search_titles(&state.client, query, rows).await?;
    info!(query, hits = results.len(), "title search");
    Ok(Json(PaperSearchResponse {
        query: query.to_string(),
        num_results: results.len(),
        results,
    }))
}

/// GET /api/search/author: semicolon-separated names, all must match
pub async fn author_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PaperSearchResponse>> {
    checked_query(&params.query)?;
    let names: Vec<String> = params
        .query
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(ApiError::BadRequest("no author names given".to_string()));
    }
    let rows = params.rows.unwrap_or(DEFAULT_ROWS);
    let results = search::search_authors(&state.client, &names, rows).await?;
    let display_query = names.join(" AND ");
    info!(query = %display_query, hits = results.len(), "author search");
    Ok(Json(PaperSearchResponse {
        query: display_query,
        num_results: results.len(),
        results,
    }))
}

#[derive(Debug, Serialize)]
pub struct CitationSearchResponse {
    pub query: String,
    pub num_results: usize,
    #[serde(flatten)]
    pub citations: CitationResults,
}

/// GET /api/search/citation
pub async fn citation_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CitationParams>,
) -> ApiResult<Json<CitationSearchResponse>> {
    let query = checked_query(&params.query)?;
    let field = match params.mode.as_deref().unwrap_or("paper") {
        "paper" => CitedField::Title,
        "author" => CitedField::Authors,
        other => {
            return Err(ApiError::BadRequest(format!(
                "unknown citation mode: {}",
                other
            )))
        }
    };
    let rows = params.rows.unwrap_or(DEFAULT_ROWS);
    let citations = search::search_citations(&state.client, query, rows, field).await?;
    info!(
        query,
        total = citations.total_citations,
        unique = citations.unique_citations,
        hits = citations.hits.len(),
        "citation search"
    );
    Ok(Json(CitationSearchResponse {
        query: query.to_string(),
        num_results: citations.hits.len(),
        citations,
    }))
}

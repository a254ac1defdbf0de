//! Frequency series and suggestion endpoints
//!
//! `GET /api/frequencies?terms=a,b&termtype=phrases&granularity=monthly`
//! answers one percentage series per term. Terms with no hits are listed
//! in `not_found` together with a user-visible message; the remaining
//! terms still get their series, so one bad term never empties a chart.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use npt_common::aggregate::{aggregate_series, FrequencyPoint};
use npt_common::phrases;
use npt_common::solr::Collection;
use npt_common::Granularity;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FrequenciesParams {
    /// Comma-separated search terms
    pub terms: String,
    /// `phrases` (default) or `entities`
    pub termtype: Option<String>,
    /// `monthly` (default) or `yearly`
    pub granularity: Option<String>,
}

/// One term's aggregated series
#[derive(Debug, Serialize)]
pub struct TermSeries {
    pub term: String,
    /// Capitalized form for chart legends
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
    pub points: Vec<FrequencyPoint>,
}

#[derive(Debug, Serialize)]
pub struct FrequenciesResponse {
    pub granularity: String,
    pub series: Vec<TermSeries>,
    pub not_found: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Which index a term type queries and how missing terms are reported
fn term_kind(termtype: Option<&str>) -> ApiResult<(Collection, &'static str)> {
    match termtype.unwrap_or("phrases") {
        "phrases" => Ok((Collection::Nounphrases, "Noun phrases")),
        "entities" => Ok((Collection::NounphrasesWikipedia, "Entities")),
        other => Err(ApiError::BadRequest(format!(
            "unknown termtype: {}",
            other
        ))),
    }
}

/// Split, normalize, and de-duplicate the comma-separated term list
fn parse_terms(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let term = phrases::normalize_term(part);
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// GET /api/frequencies
pub async fn frequencies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FrequenciesParams>,
) -> ApiResult<Json<FrequenciesResponse>> {
    let terms = parse_terms(&params.terms);
    if terms.is_empty() {
        return Err(ApiError::BadRequest("no search terms given".to_string()));
    }

    let (collection, kind) = term_kind(params.termtype.as_deref())?;
    let granularity: Granularity = params
        .granularity
        .as_deref()
        .unwrap_or("monthly")
        .parse()
        .map_err(|err: npt_common::Error| ApiError::BadRequest(err.to_string()))?;
    let totals = match granularity {
        Granularity::Monthly => &state.monthly_totals,
        Granularity::Yearly => &state.yearly_totals,
    };

    let mut series = Vec::with_capacity(terms.len());
    let mut not_found = Vec::new();
    for term in terms {
        let (query, wikipedia_url) = match collection {
            Collection::NounphrasesWikipedia => {
                let url = phrases::to_wikipedia_url(&term);
                (url.clone(), Some(url))
            }
            _ => (term.clone(), None),
        };
        let records = state.client.phrase_records(&query, collection).await?;
        if records.is_empty() {
            not_found.push(term);
            continue;
        }
        let points = aggregate_series(&records, granularity, totals, &state.excluded_periods);
        series.push(TermSeries {
            display: phrases::display_term(&term),
            term,
            wikipedia_url,
            points,
        });
    }

    info!(
        found = series.len(),
        missing = not_found.len(),
        "frequency query answered"
    );
    let message = if not_found.is_empty() {
        None
    } else {
        Some(phrases::not_found_message(kind, &not_found))
    };
    Ok(Json(FrequenciesResponse {
        granularity: granularity.to_string(),
        series,
        not_found,
        message,
    }))
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// GET /api/suggestions
pub async fn suggestions(State(state): State<Arc<AppState>>) -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: state.suggestions.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_normalized_and_deduplicated() {
        let terms = parse_terms(" Machine Learning ,neural network,machine learning,,");
        assert_eq!(terms, vec!["machine learning", "neural network"]);
    }

    #[test]
    fn unknown_termtype_is_rejected() {
        assert!(term_kind(Some("phrases")).is_ok());
        assert!(term_kind(None).is_ok());
        assert!(term_kind(Some("verbs")).is_err());
    }

    #[test]
    fn entity_kind_queries_the_wikipedia_index() {
        let (collection, kind) = term_kind(Some("entities")).unwrap();
        assert_eq!(collection, Collection::NounphrasesWikipedia);
        assert_eq!(kind, "Entities");
    }
}

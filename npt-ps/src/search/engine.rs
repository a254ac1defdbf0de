//! The four search modes against the backing index
//!
//! Sentence hits are enriched per paper: the preferred metadata comes
//! from `arxiv_metadata`, with `metadata` (DBLP) as the fallback source
//! for title/authors and the only source for the DBLP URL. Citation
//! search goes through `references` first, then resolves each citing
//! annotation back to sentences.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use npt_common::solr::{field_str, field_str_list, Collection, SolrClient, ALL_ROWS};
use npt_common::Result;

use super::normalize::{
    format_published_dates, join_authors, or_message, NO_ARXIV_URL, NO_TITLE,
};
use super::query;

/// One sentence hit with the owning paper's metadata
#[derive(Debug, Clone, Serialize)]
pub struct SentenceHit {
    pub sentence: String,
    pub document_id: String,
    pub title: String,
    pub authors: String,
    pub arxiv_url: String,
    pub published: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dblp_url: Option<String>,
}

/// One metadata hit from a title or author search
#[derive(Debug, Clone, Serialize)]
pub struct PaperHit {
    pub title: String,
    pub authors: String,
    pub arxiv_url: String,
    pub document_id: String,
    pub published: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dblp_url: Option<String>,
}

/// Phrase search over the sentence index, one enriched hit per sentence
pub async fn search_sentences(
    client: &SolrClient,
    raw_query: &str,
    rows: u32,
) -> Result<Vec<SentenceHit>> {
    let docs = client
        .select(raw_query, Collection::Papers, "sentence", rows)
        .await?;
    let mut hits = Vec::with_capacity(docs.len());
    for doc in &docs {
        let sentence = field_str(doc, "sentence").unwrap_or_default();
        let Some(document_id) = field_str(doc, "fileName") else {
            continue;
        };
        hits.push(enrich_sentence(client, sentence, document_id).await?);
    }
    Ok(hits)
}

async fn enrich_sentence(
    client: &SolrClient,
    sentence: String,
    document_id: String,
) -> Result<SentenceHit> {
    let arxiv = metadata_lookup(client, &document_id, Collection::ArxivMetadata).await?;
    let dblp = metadata_lookup(client, &document_id, Collection::Metadata).await?;
    let dblp_url = dblp
        .as_ref()
        .and_then(|doc| field_str(doc, "url"))
        .filter(|url| !url.is_empty());

    let hit = match arxiv {
        Some(doc) => SentenceHit {
            sentence,
            title: or_message(field_str(&doc, "title"), NO_TITLE),
            authors: join_authors(&field_str_list(&doc, "authors")),
            arxiv_url: or_message(field_str(&doc, "url"), NO_ARXIV_URL),
            published: format_published_dates(&field_str_list(&doc, "published_date")),
            document_id,
            dblp_url,
        },
        None => match dblp {
            // DBLP-only paper: no arXiv URL or date exists for it
            Some(doc) => SentenceHit {
                sentence,
                title: or_message(field_str(&doc, "title"), NO_TITLE),
                authors: join_authors(&field_str_list(&doc, "authors")),
                arxiv_url: NO_ARXIV_URL.to_string(),
                published: format_published_dates(&[]),
                document_id,
                dblp_url,
            },
            None => SentenceHit {
                sentence,
                title: NO_TITLE.to_string(),
                authors: join_authors(&[]),
                arxiv_url: NO_ARXIV_URL.to_string(),
                published: format_published_dates(&[]),
                document_id,
                dblp_url: None,
            },
        },
    };
    Ok(hit)
}

/// Exact match on `arxiv_identifier`; at most one record exists per id
async fn metadata_lookup(
    client: &SolrClient,
    document_id: &str,
    collection: Collection,
) -> Result<Option<Value>> {
    let docs = client
        .select(document_id, collection, "arxiv_identifier", 1)
        .await?;
    Ok(docs.into_iter().next())
}

/// Title search over `arxiv_metadata`
pub async fn search_titles(
    client: &SolrClient,
    raw_query: &str,
    rows: u32,
) -> Result<Vec<PaperHit>> {
    let docs = client
        .select(raw_query, Collection::ArxivMetadata, "title", rows)
        .await?;
    paper_hits(client, docs).await
}

/// Author search over `arxiv_metadata`: every listed name must match
pub async fn search_authors(
    client: &SolrClient,
    names: &[String],
    rows: u32,
) -> Result<Vec<PaperHit>> {
    let q = query::authors_and(names);
    let docs = client
        .select_raw(&q, Collection::ArxivMetadata, "authors", rows)
        .await?;
    paper_hits(client, docs).await
}

async fn paper_hits(client: &SolrClient, docs: Vec<Value>) -> Result<Vec<PaperHit>> {
    let mut hits = Vec::with_capacity(docs.len());
    for doc in &docs {
        let Some(document_id) = field_str(doc, "arxiv_identifier") else {
            continue;
        };
        let dblp = metadata_lookup(client, &document_id, Collection::Metadata).await?;
        let dblp_url = dblp
            .as_ref()
            .and_then(|d| field_str(d, "url"))
            .filter(|url| !url.is_empty());
        hits.push(PaperHit {
            title: or_message(field_str(doc, "title"), NO_TITLE),
            authors: join_authors(&field_str_list(doc, "authors")),
            arxiv_url: or_message(field_str(doc, "url"), NO_ARXIV_URL),
            published: format_published_dates(&field_str_list(doc, "published_date")),
            document_id,
            dblp_url,
        });
    }
    Ok(hits)
}

/// Which part of the cited-paper details a citation search matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitedField {
    Title,
    Authors,
}

/// One citing sentence, tagged with the citation it resolves
#[derive(Debug, Clone, Serialize)]
pub struct CitationHit {
    /// In-text citation marker, e.g. `(Smith et al., 2015)`
    pub annotation: String,
    /// The cited paper's reference-list entry
    pub details: String,
    #[serde(flatten)]
    pub hit: SentenceHit,
}

#[derive(Debug, Clone, Serialize)]
pub struct CitationResults {
    /// All matching reference entries, including duplicates
    pub total_citations: usize,
    /// Distinct citation annotations among them
    pub unique_citations: usize,
    pub hits: Vec<CitationHit>,
}

/// Cited paper/author search: find matching reference entries, then the
/// sentences citing them. Each distinct annotation is resolved at most
/// once; resolution stops as soon as `rows` sentence hits are collected.
pub async fn search_citations(
    client: &SolrClient,
    raw_query: &str,
    rows: u32,
    field: CitedField,
) -> Result<CitationResults> {
    let q = match field {
        CitedField::Title => query::proximity_title(raw_query),
        CitedField::Authors => query::proximity_authors(raw_query),
    };
    let docs = client
        .select_raw(&q, Collection::References, "details", ALL_ROWS)
        .await?;
    let total_citations = docs.len();

    // Distinct annotations in result order, first details string wins
    let mut seen: HashSet<String> = HashSet::new();
    let mut citations: Vec<(String, String)> = Vec::new();
    for doc in &docs {
        let Some(annotation) = field_str(doc, "annotation") else {
            continue;
        };
        if seen.insert(annotation.clone()) {
            let details = field_str(doc, "details").unwrap_or_default();
            citations.push((annotation, details));
        }
    }
    let unique_citations = citations.len();
    debug!(total_citations, unique_citations, "citation query");

    // A handful of spare annotations beyond `rows` covers annotations
    // that resolve to no sentence at all
    let budget = rows as usize;
    if budget < citations.len() {
        citations.truncate(budget + 5);
    }

    let mut hits: Vec<CitationHit> = Vec::new();
    for (annotation, details) in citations {
        let sentence_hits = search_sentences(client, &annotation, rows).await?;
        for hit in sentence_hits {
            hits.push(CitationHit {
                annotation: annotation.clone(),
                details: details.clone(),
                hit,
            });
        }
        if hits.len() >= budget {
            hits.truncate(budget);
            break;
        }
    }

    Ok(CitationResults {
        total_citations,
        unique_citations,
        hits,
    })
}

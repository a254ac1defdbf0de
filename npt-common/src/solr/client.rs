//! HTTP client for the Solr REST API

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::types::{field_str, parse_solr_date, Collection, PhraseRecord};
use crate::{Error, Result};

/// `rows` value used when a query should return every matching record.
/// The backend caps the response at this count; the corpus is two orders
/// of magnitude smaller.
pub const ALL_ROWS: u32 = 1_000_000;

/// Thin client for Solr `/select` and `/update`
#[derive(Debug, Clone)]
pub struct SolrClient {
    http: reqwest::Client,
    base_url: String,
}

impl SolrClient {
    /// Create a client for the Solr instance at `base_url`
    /// (e.g. `http://localhost:8983`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Exact-phrase `/select` query: the input is wrapped in double quotes.
    /// Special characters inside the query are NOT escaped; this is a known
    /// gap inherited from the index conventions.
    pub async fn select(
        &self,
        query: &str,
        collection: Collection,
        search_field: &str,
        rows: u32,
    ) -> Result<Vec<Value>> {
        let quoted = format!("\"{}\"", query);
        self.select_raw(&quoted, collection, search_field, rows).await
    }

    /// `/select` query with a caller-built query string (range queries,
    /// proximity queries, AND-joined author queries)
    pub async fn select_raw(
        &self,
        query: &str,
        collection: Collection,
        search_field: &str,
        rows: u32,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/solr/{}/select", self.base_url, collection);
        debug!(collection = %collection, df = search_field, query, "solr select");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("rows", &rows.to_string()),
                ("df", search_field),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::ServiceUnavailable {
                status: response.status().as_u16(),
                url,
            });
        }

        let envelope: Value = response.json().await?;
        let docs = envelope
            .get("response")
            .and_then(|r| r.get("docs"))
            .and_then(|d| d.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(docs)
    }

    /// Date-range `/select` query on `published_date`:
    /// `[<from>T00:00:00Z TO <to>T23:59:59Z]`
    pub async fn select_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        collection: Collection,
        rows: u32,
    ) -> Result<Vec<Value>> {
        let query = format!("[{}T00:00:00Z TO {}T23:59:59Z]", from, to);
        self.select_raw(&query, collection, "published_date", rows).await
    }

    /// Exact-phrase query parsed into [`PhraseRecord`]s
    pub async fn phrase_records(
        &self,
        query: &str,
        collection: Collection,
    ) -> Result<Vec<PhraseRecord>> {
        let field = collection.phrase_field();
        let docs = self.select(query, collection, field, ALL_ROWS).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| PhraseRecord::from_doc(doc, field))
            .collect())
    }

    /// Date-range query parsed into [`PhraseRecord`]s
    pub async fn phrase_records_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        collection: Collection,
    ) -> Result<Vec<PhraseRecord>> {
        let docs = self.select_date_range(from, to, collection, ALL_ROWS).await?;
        Ok(docs
            .iter()
            .filter_map(|doc| PhraseRecord::from_doc(doc, collection.phrase_field()))
            .collect())
    }

    /// Look up the published date of one paper in `arxiv_metadata`.
    /// Exact match on `arxiv_identifier`; at most one paper exists per id,
    /// and only the first version's date matters (revision dates ignored).
    pub async fn published_date(&self, document_id: &str) -> Result<Option<NaiveDate>> {
        let docs = self
            .select(document_id, Collection::ArxivMetadata, "arxiv_identifier", 1)
            .await?;
        Ok(docs
            .first()
            .and_then(|doc| field_str(doc, "published_date"))
            .as_deref()
            .and_then(parse_solr_date))
    }

    /// Post a batch of documents to `/update?commit=true`
    pub async fn add(&self, collection: Collection, docs: &[Value]) -> Result<()> {
        let url = format!(
            "{}/solr/{}/update?commit=true",
            self.base_url, collection
        );
        debug!(collection = %collection, count = docs.len(), "solr add");
        let response = self.http.post(&url).json(docs).send().await?;
        if !response.status().is_success() {
            return Err(Error::ServiceUnavailable {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }
}

//! Collections and record types for the Solr schema

use chrono::NaiveDate;
use serde_json::Value;

/// Logical collection names in the backing Solr instance.
/// Wire names match the index names exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Per-document noun-phrase occurrence records
    Nounphrases,
    /// Per-document Wikipedia entity-mention records
    NounphrasesWikipedia,
    /// arXiv paper metadata (title, authors, url, published date)
    ArxivMetadata,
    /// DBLP metadata (title, authors, dblp url)
    Metadata,
    /// Citation annotations with the cited paper's details
    References,
    /// Full-text sentences per paper
    Papers,
    /// Sentences joined with citation and metadata fields
    PapersPlus,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Nounphrases => "nounphrases",
            Collection::NounphrasesWikipedia => "nounphrases_wikipedia",
            Collection::ArxivMetadata => "arxiv_metadata",
            Collection::Metadata => "metadata",
            Collection::References => "references",
            Collection::Papers => "papers",
            Collection::PapersPlus => "papers_plus",
        }
    }

    /// Default search field for the phrase-style collections
    pub fn phrase_field(&self) -> &'static str {
        match self {
            Collection::NounphrasesWikipedia => "wikipedia_url",
            _ => "phrase",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phrase-occurrence record from the `nounphrases` /
/// `nounphrases_wikipedia` collections. Immutable once emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseRecord {
    pub phrase: String,
    /// None when the stored date was missing or unparseable; such records
    /// are discarded by the aggregation pipeline.
    pub published_date: Option<NaiveDate>,
    pub document_id: String,
    pub num_occurrences: u64,
}

impl PhraseRecord {
    /// Build a record from one document of the Solr JSON envelope.
    /// Solr returns single-valued fields either as scalars or as
    /// one-element arrays depending on the schema, so both shapes are
    /// accepted. Returns None when the phrase field is absent.
    pub fn from_doc(doc: &Value, phrase_field: &str) -> Option<PhraseRecord> {
        let phrase = field_str(doc, phrase_field)?;
        Some(PhraseRecord {
            phrase,
            published_date: field_str(doc, "published_date")
                .as_deref()
                .and_then(parse_solr_date),
            document_id: field_str(doc, "arxiv_identifier").unwrap_or_default(),
            num_occurrences: field_u64(doc, "num_occurrences").unwrap_or(0),
        })
    }
}

/// Extract a string field, tolerating the scalar-or-array shapes
pub fn field_str(doc: &Value, key: &str) -> Option<String> {
    match doc.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(|v| v.as_str()).map(String::from),
        other => other.as_i64().map(|n| n.to_string()),
    }
}

/// Extract all values of a multi-valued string field (e.g. authors)
pub fn field_str_list(doc: &Value, key: &str) -> Vec<String> {
    match doc.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Extract an integer field, tolerating the scalar-or-array shapes
pub fn field_u64(doc: &Value, key: &str) -> Option<u64> {
    match doc.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::Array(items) => items.first().and_then(|v| v.as_u64()),
        _ => None,
    }
}

/// Parse Solr's timestamp format (`2012-07-14T00:00:00Z`), keeping the
/// date part only
pub fn parse_solr_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_from_scalar_fields() {
        let doc = json!({
            "phrase": "machine learning",
            "published_date": "2012-07-14T00:00:00Z",
            "arxiv_identifier": "1207.1234",
            "num_occurrences": 5,
            "_version_": 1234567890u64,
            "id": "abc"
        });
        let record = PhraseRecord::from_doc(&doc, "phrase").unwrap();
        assert_eq!(record.phrase, "machine learning");
        assert_eq!(
            record.published_date,
            Some(NaiveDate::from_ymd_opt(2012, 7, 14).unwrap())
        );
        assert_eq!(record.document_id, "1207.1234");
        assert_eq!(record.num_occurrences, 5);
    }

    #[test]
    fn record_from_array_fields() {
        let doc = json!({
            "phrase": ["semantic web"],
            "published_date": ["2010-01-02T00:00:00Z"],
            "arxiv_identifier": ["1001.0001"],
            "num_occurrences": [3]
        });
        let record = PhraseRecord::from_doc(&doc, "phrase").unwrap();
        assert_eq!(record.phrase, "semantic web");
        assert_eq!(record.num_occurrences, 3);
    }

    #[test]
    fn bad_date_becomes_none() {
        let doc = json!({
            "phrase": "x",
            "published_date": "not-a-date",
            "num_occurrences": 1
        });
        let record = PhraseRecord::from_doc(&doc, "phrase").unwrap();
        assert_eq!(record.published_date, None);
    }

    #[test]
    fn missing_phrase_field_is_rejected() {
        let doc = json!({ "num_occurrences": 1 });
        assert!(PhraseRecord::from_doc(&doc, "phrase").is_none());
    }
}

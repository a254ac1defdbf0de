//! Search engine core: query construction, Solr result parsing, and
//! display normalization. Kept free of HTTP types so it can be tested
//! without a running server.

pub mod engine;
pub mod normalize;
pub mod query;

pub use engine::{
    search_authors, search_citations, search_sentences, search_titles, CitationHit,
    CitationResults, CitedField, PaperHit, SentenceHit,
};

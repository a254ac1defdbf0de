//! Solr client adapter
//!
//! A thin HTTP wrapper around the Solr REST API: `/select` queries with
//! `q`/`rows`/`df` parameters and `/update` document posts. Responses are
//! parsed from the standard JSON envelope. A non-success HTTP status maps
//! to [`crate::Error::ServiceUnavailable`] and terminates the calling job.

mod client;
mod types;

pub use client::{SolrClient, ALL_ROWS};
pub use types::{field_str, field_str_list, Collection, PhraseRecord};

//! # NPTrends Common Library
//!
//! Shared code for all nptrends jobs and services including:
//! - Solr client adapter and record types
//! - Period bucketing (monthly/yearly) and period-totals lookup
//! - The frequency aggregation-and-normalization pipeline
//! - Phrase filtering rules
//! - Configuration loading
//! - TSV output helpers

pub mod aggregate;
pub mod config;
pub mod error;
pub mod period;
pub mod phrases;
pub mod solr;
pub mod totals;
pub mod tsv;

pub use error::{Error, Result};
pub use period::Granularity;

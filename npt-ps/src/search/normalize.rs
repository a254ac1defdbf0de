//! Display normalization for search results
//!
//! Metadata records in the index are patchy: papers without authors,
//! without a URL, or without a stored date exist. Missing fields are
//! replaced with explicit user-visible messages instead of blanks, and
//! Solr timestamps are reformatted for display.

use chrono::NaiveDate;

pub const NO_TITLE: &str = "No title found for this result";
pub const NO_AUTHORS: &str = "No author metadata found for this result";
pub const NO_ARXIV_URL: &str = "No arXiv URL found for this result";
pub const NO_DATE: &str = "No published date found for this result";

const REVISIONS_NOTE: &str = " (multiple dates indicate revisions to the paper)";

/// A possibly-empty string field with a fallback message
pub fn or_message(value: Option<String>, message: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => message.to_string(),
    }
}

/// Author list joined with `; `, or the no-authors message
pub fn join_authors(authors: &[String]) -> String {
    if authors.is_empty() {
        NO_AUTHORS.to_string()
    } else {
        authors.join("; ")
    }
}

/// Solr timestamps (`2018-03-25T00:00:00Z`) reformatted as
/// `March 25, 2018`, joined with `; `. More than one date means the
/// paper was revised, which the display notes explicitly.
pub fn format_published_dates(dates: &[String]) -> String {
    let formatted: Vec<String> = dates
        .iter()
        .filter_map(|raw| {
            let day = raw.get(..10)?;
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        })
        .map(|date| date.format("%B %d, %Y").to_string())
        .collect();
    if formatted.is_empty() {
        return NO_DATE.to_string();
    }
    let joined = formatted.join("; ");
    if formatted.len() > 1 {
        format!("{}{}", joined, REVISIONS_NOTE)
    } else {
        joined
    }
}

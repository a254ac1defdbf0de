//! Phrase filtering and term normalization rules
//!
//! Malformed phrases are filtered best-effort: anything starting with a
//! reserved character, and anything without a single letter (pure numbers
//! and symbols such as `25%`, `13`, `8&26`).

/// Leading characters that mark a phrase as malformed
pub const RESERVED_LEADING: &[char] = &[
    '|', '#', '*', '%', '@', '!', '~', '&', '>', '<', '\\', '/', '?', ';', ':', ']', '[', '}',
    '{', '(', ')', '_', '-', '=', '+', '^',
];

/// Whether a (lower-cased) phrase passes the denylist rules
pub fn is_reportable(phrase: &str) -> bool {
    if phrase.starts_with(RESERVED_LEADING) {
        return false;
    }
    phrase.chars().any(|c| c.is_ascii_lowercase())
}

/// Normalize one part of a comma-separated user query: trim surrounding
/// whitespace and lower-case
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Display form of a search term in user-facing messages
pub fn display_term(term: &str) -> String {
    let mut chars = term.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

const WIKIPEDIA_PREFIX: &str = "http://en.wikipedia.org/wiki/";

/// Convert an entity-mention search term to its Wikipedia-URL form:
/// `word1 word2` → `http://en.wikipedia.org/wiki/word1_word2`.
/// Terms that already carry the prefix pass through unchanged.
pub fn to_wikipedia_url(term: &str) -> String {
    if term.starts_with("http://en.wikipedia.org/wiki") {
        return term.to_string();
    }
    format!("{}{}", WIKIPEDIA_PREFIX, term.replace(' ', "_"))
}

/// User-visible message listing search terms with no hits in the index
pub fn not_found_message(kind: &str, notfound: &[String]) -> String {
    let quoted: Vec<String> = notfound
        .iter()
        .map(|term| format!("\"{}\"", display_term(term)))
        .collect();
    format!("{} not found: {}.", kind, quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_drops_reserved_and_letterless() {
        assert!(is_reportable("machine learning"));
        assert!(is_reportable("3d reconstruction"));
        assert!(!is_reportable("#hashtag"));
        assert!(!is_reportable("-dash"));
        assert!(!is_reportable("(paren"));
        assert!(!is_reportable("25%"));
        assert!(!is_reportable("13"));
        assert!(!is_reportable("8&26"));
        assert!(!is_reportable(""));
    }

    #[test]
    fn term_normalization() {
        assert_eq!(normalize_term("  Machine Learning "), "machine learning");
        assert_eq!(display_term("machine learning"), "Machine learning");
    }

    #[test]
    fn wikipedia_url_conversion() {
        assert_eq!(
            to_wikipedia_url("machine learning"),
            "http://en.wikipedia.org/wiki/machine_learning"
        );
        assert_eq!(
            to_wikipedia_url("http://en.wikipedia.org/wiki/Deep_learning"),
            "http://en.wikipedia.org/wiki/Deep_learning"
        );
    }

    #[test]
    fn not_found_message_lists_terms() {
        let missing = vec!["foo bar".to_string(), "baz".to_string()];
        assert_eq!(
            not_found_message("Noun phrases", &missing),
            "Noun phrases not found: \"Foo bar\", \"Baz\"."
        );
    }
}

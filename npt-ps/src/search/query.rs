//! Query-string construction for the different search modes
//!
//! The backing index stores cited-paper details as one running string
//! ("Author and Author. Title. Venue year."), so title and author
//! lookups use proximity queries instead of exact phrases: the words may
//! appear in a different order, or with "and" between author names.

/// Cited-paper title: proximity equal to the word count, so the title
/// words may be reordered but nothing else may intervene
pub fn proximity_title(query: &str) -> String {
    format!("\"{}\"~{}", query, query.split_whitespace().count())
}

/// Cited-author names: word count plus 8, leaving room for "and"s and
/// co-author names between the queried words
pub fn proximity_authors(query: &str) -> String {
    format!("\"{}\"~{}", query, query.split_whitespace().count() + 8)
}

/// AND-joined author query: each name becomes its own proximity phrase,
/// so every listed author must appear
pub fn authors_and(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{}\"~{}", name, name.split_whitespace().count()))
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_proximity_equals_word_count() {
        assert_eq!(
            proximity_title("attention is all you need"),
            "\"attention is all you need\"~5"
        );
    }

    #[test]
    fn author_proximity_allows_intervening_names() {
        assert_eq!(proximity_authors("John Smith"), "\"John Smith\"~10");
    }

    #[test]
    fn author_list_joins_with_and() {
        let names = vec!["John Smith".to_string(), "Ada Lovelace".to_string()];
        assert_eq!(
            authors_and(&names),
            "\"John Smith\"~2 AND \"Ada Lovelace\"~2"
        );
    }
}

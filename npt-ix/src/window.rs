//! Date-range window extraction
//!
//! One date-range query, grouped per phrase and normalized to percent of
//! the window's own totals, written as a TSV table. Feeds the delta job
//! and ad-hoc analysis.

use std::path::Path;

use chrono::NaiveDate;

use npt_common::aggregate::{group_by_phrase, PhraseWindowRow};
use npt_common::solr::{Collection, SolrClient};
use npt_common::tsv::{fmt_pct, write_table, TsvTable};
use npt_common::Result;

pub const WINDOW_COLUMNS: [&str; 5] = [
    "phrase",
    "total_occurrences",
    "total_docs",
    "percentage_occurrences",
    "percentage_docs",
];

/// Query one window and group per phrase
pub async fn query_window(
    client: &SolrClient,
    collection: Collection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PhraseWindowRow>> {
    let records = client.phrase_records_in_range(from, to, collection).await?;
    Ok(group_by_phrase(&records))
}

/// Render the grouped window as a TSV table
pub fn window_table(rows: &[PhraseWindowRow]) -> TsvTable {
    let mut table = TsvTable::new(WINDOW_COLUMNS.to_vec());
    for row in rows {
        table.push_row(vec![
            row.phrase.clone(),
            row.total_occurrences.to_string(),
            row.total_docs.to_string(),
            fmt_pct(row.percentage_occurrences),
            fmt_pct(row.percentage_docs),
        ]);
    }
    table
}

/// Query one window and write it to `<output>/QueryResults/<filename>`
pub async fn run(
    client: &SolrClient,
    collection: Collection,
    from: NaiveDate,
    to: NaiveDate,
    output_folder: &Path,
    filename: &str,
) -> Result<usize> {
    let rows = query_window(client, collection, from, to).await?;
    let table = window_table(&rows);
    write_table(&output_folder.join("QueryResults"), filename, &table)?;
    Ok(rows.len())
}

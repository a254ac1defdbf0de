//! Difference between two time windows
//!
//! Queries two date windows (by default the last four months of the first
//! and last corpus years), groups each per phrase, and reports the change
//! in percentage between the windows. Phrases absent from a window count
//! as 0 there. Two sorted tables are written: positive deltas descending
//! and negative deltas ascending.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;

use npt_common::solr::{Collection, SolrClient};
use npt_common::tsv::{fmt_pct, write_table, TsvTable};
use npt_common::Result;

use crate::widetable::Metric;

/// Percentage change of one phrase between the two windows
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRow {
    pub phrase: String,
    pub earlier: f64,
    pub later: f64,
    pub delta: f64,
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Join two per-phrase percentage maps into delta rows over the union of
/// their phrases
pub fn join_windows(
    earlier: &BTreeMap<String, f64>,
    later: &BTreeMap<String, f64>,
) -> Vec<DeltaRow> {
    let phrases: BTreeSet<&String> = earlier.keys().chain(later.keys()).collect();
    phrases
        .into_iter()
        .map(|phrase| {
            let before = earlier.get(phrase).copied().unwrap_or(0.0);
            let after = later.get(phrase).copied().unwrap_or(0.0);
            DeltaRow {
                phrase: phrase.clone(),
                earlier: before,
                later: after,
                delta: after - before,
            }
        })
        .collect()
}

/// Split into positive (descending) and negative (ascending) tables;
/// zero deltas are reported in neither
pub fn split_deltas(rows: Vec<DeltaRow>) -> (Vec<DeltaRow>, Vec<DeltaRow>) {
    let mut positive: Vec<DeltaRow> = rows.iter().filter(|r| r.delta > 0.0).cloned().collect();
    positive.sort_by(|a, b| b.delta.partial_cmp(&a.delta).unwrap_or(std::cmp::Ordering::Equal));
    let mut negative: Vec<DeltaRow> = rows.into_iter().filter(|r| r.delta < 0.0).collect();
    negative.sort_by(|a, b| a.delta.partial_cmp(&b.delta).unwrap_or(std::cmp::Ordering::Equal));
    (positive, negative)
}

/// Query both windows and write the positive/negative trend tables
pub async fn run(
    client: &SolrClient,
    collection: Collection,
    metric: Metric,
    earlier: Window,
    later: Window,
    output_folder: &Path,
    subfolder: &str,
) -> Result<(usize, usize)> {
    let earlier_map = window_percentages(client, collection, metric, earlier).await?;
    let later_map = window_percentages(client, collection, metric, later).await?;

    let (positive, negative) = split_deltas(join_windows(&earlier_map, &later_map));
    let dir = output_folder.join(subfolder);
    write_table(&dir, "positive_trends.tsv", &render(&positive))?;
    write_table(&dir, "negative_trends.tsv", &render(&negative))?;
    Ok((positive.len(), negative.len()))
}

async fn window_percentages(
    client: &SolrClient,
    collection: Collection,
    metric: Metric,
    window: Window,
) -> Result<BTreeMap<String, f64>> {
    let records = client
        .phrase_records_in_range(window.from, window.to, collection)
        .await?;
    Ok(npt_common::aggregate::group_by_phrase(&records)
        .into_iter()
        .map(|row| {
            let value = match metric {
                Metric::Occurrences => row.percentage_occurrences,
                Metric::Documents => row.percentage_docs,
            };
            (row.phrase, value)
        })
        .collect())
}

fn render(rows: &[DeltaRow]) -> TsvTable {
    let mut table = TsvTable::new(vec![
        "phrase",
        "earlier_percentage",
        "later_percentage",
        "delta",
    ]);
    for row in rows {
        table.push_row(vec![
            row.phrase.clone(),
            fmt_pct(row.earlier),
            fmt_pct(row.later),
            fmt_pct(row.delta),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn union_join_fills_missing_sides_with_zero() {
        let earlier = map(&[("fading", 5.0), ("stable", 2.0)]);
        let later = map(&[("rising", 4.0), ("stable", 2.0)]);
        let rows = join_windows(&earlier, &later);
        assert_eq!(rows.len(), 3);

        let (positive, negative) = split_deltas(rows);
        assert_eq!(positive.len(), 1);
        assert_eq!(positive[0].phrase, "rising");
        assert_eq!(positive[0].delta, 4.0);
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].phrase, "fading");
        assert_eq!(negative[0].delta, -5.0);
    }

    #[test]
    fn tables_are_sorted_by_magnitude() {
        let earlier = map(&[("a", 1.0), ("b", 9.0), ("c", 3.0)]);
        let later = map(&[("a", 6.0), ("b", 1.0), ("c", 5.0)]);
        let (positive, negative) = split_deltas(join_windows(&earlier, &later));
        assert_eq!(positive[0].phrase, "a"); // +5 before +2
        assert_eq!(positive[1].phrase, "c");
        assert_eq!(negative[0].phrase, "b"); // -8 first
    }
}

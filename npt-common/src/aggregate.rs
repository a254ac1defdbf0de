//! The frequency aggregation-and-normalization pipeline
//!
//! Turns raw per-document phrase-occurrence records into time-bucketed,
//! percentage-normalized series:
//! 1. Discard records with missing or unparseable dates.
//! 2. Bucket by the requested granularity (calendar month or year).
//! 3. Per bucket: `sum(num_occurrences)` → total occurrences, record count
//!    → document frequency (upstream guarantees at most one record per
//!    document per bucket).
//! 4. Normalize both values against the precomputed period totals;
//!    a zero or missing denominator yields 0.
//!
//! Buckets whose period key appears in the exclusion list are dropped
//! before normalization (degenerate partial periods distort the scale).

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::Serialize;

use crate::phrases;
use crate::solr::PhraseRecord;
use crate::totals::PeriodTotals;
use crate::Granularity;

/// One aggregated bucket of a term's frequency series.
/// Derived deterministically from records + totals; recomputed per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyPoint {
    /// Period key (`YYYY-MM` or `YYYY`)
    pub period: String,
    /// Start date of the bucket
    pub start: NaiveDate,
    pub total_occurrences: u64,
    pub document_frequency: u64,
    /// Percent of all phrase occurrences in the period
    pub percentage_occurrences: f64,
    /// Percent of all documents in the period
    pub percentage_documents: f64,
}

/// Aggregate one term's records into a time-bucketed percentage series
pub fn aggregate_series(
    records: &[PhraseRecord],
    granularity: Granularity,
    totals: &PeriodTotals,
    excluded_periods: &[String],
) -> Vec<FrequencyPoint> {
    // key → (bucket start, total occurrences, document frequency)
    let mut buckets: BTreeMap<String, (NaiveDate, u64, u64)> = BTreeMap::new();
    for record in records {
        let Some(date) = record.published_date else {
            continue;
        };
        let key = granularity.key(date);
        if excluded_periods.iter().any(|p| p == &key) {
            continue;
        }
        let entry = buckets
            .entry(key)
            .or_insert_with(|| (granularity.bucket_start(date), 0, 0));
        entry.1 += record.num_occurrences;
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(period, (start, total, docs))| FrequencyPoint {
            percentage_occurrences: totals.phrase_percentage(&period, total),
            percentage_documents: totals.document_percentage(&period, docs),
            period,
            start,
            total_occurrences: total,
            document_frequency: docs,
        })
        .collect()
}

/// One phrase's aggregate over a whole date window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseWindowRow {
    pub phrase: String,
    pub total_occurrences: u64,
    pub total_docs: u64,
    /// Percent of the window's summed occurrences
    pub percentage_occurrences: f64,
    /// Percent of the window's summed document frequencies
    pub percentage_docs: f64,
}

/// Group a date-range query result by phrase: sum and count per phrase,
/// drop denylisted phrases, normalize against the window's own totals,
/// sort by percentage occurrences descending.
pub fn group_by_phrase(records: &[PhraseRecord]) -> Vec<PhraseWindowRow> {
    let mut grouped: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for record in records {
        if !phrases::is_reportable(&record.phrase) {
            continue;
        }
        let entry = grouped.entry(record.phrase.clone()).or_insert((0, 0));
        entry.0 += record.num_occurrences;
        entry.1 += 1;
    }

    let occurrence_sum: u64 = grouped.values().map(|(total, _)| total).sum();
    let doc_sum: u64 = grouped.values().map(|(_, docs)| docs).sum();

    let mut rows: Vec<PhraseWindowRow> = grouped
        .into_iter()
        .map(|(phrase, (total, docs))| PhraseWindowRow {
            phrase,
            total_occurrences: total,
            total_docs: docs,
            percentage_occurrences: crate::totals::percentage(total, Some(&occurrence_sum)),
            percentage_docs: crate::totals::percentage(docs, Some(&doc_sum)),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.percentage_occurrences
            .partial_cmp(&a.percentage_occurrences)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(phrase: &str, date: Option<(i32, u32, u32)>, doc: &str, n: u64) -> PhraseRecord {
        PhraseRecord {
            phrase: phrase.to_string(),
            published_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            document_id: doc.to_string(),
            num_occurrences: n,
        }
    }

    fn totals_2010(phrase_total: u64, doc_total: u64) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        totals.phrases.insert("2010".into(), phrase_total);
        totals.documents.insert("2010".into(), doc_total);
        totals
    }

    #[test]
    fn known_corpus_yields_exact_counts() {
        // phrase "x" in docs {A, B} with counts {3, 5} in bucket "2010"
        let records = vec![
            record("x", Some((2010, 2, 1)), "A", 3),
            record("x", Some((2010, 9, 14)), "B", 5),
        ];
        let totals = totals_2010(80, 4);
        let series = aggregate_series(&records, Granularity::Yearly, &totals, &[]);
        assert_eq!(series.len(), 1);
        let point = &series[0];
        assert_eq!(point.period, "2010");
        assert_eq!(point.total_occurrences, 8);
        assert_eq!(point.document_frequency, 2);
        assert_eq!(point.percentage_occurrences, 10.0);
        assert_eq!(point.percentage_documents, 50.0);
    }

    #[test]
    fn undated_records_are_discarded() {
        let records = vec![
            record("x", Some((2010, 2, 1)), "A", 3),
            record("x", None, "B", 100),
        ];
        let totals = totals_2010(100, 10);
        let series = aggregate_series(&records, Granularity::Yearly, &totals, &[]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total_occurrences, 3);
        assert_eq!(series[0].document_frequency, 1);
    }

    #[test]
    fn monthly_buckets_are_keyed_by_start() {
        let records = vec![
            record("x", Some((2012, 7, 14)), "A", 2),
            record("x", Some((2012, 7, 2)), "B", 4),
            record("x", Some((2012, 8, 1)), "C", 1),
        ];
        let mut totals = PeriodTotals::default();
        totals.phrases.insert("2012-07".into(), 12);
        totals.documents.insert("2012-07".into(), 4);
        let series = aggregate_series(&records, Granularity::Monthly, &totals, &[]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period, "2012-07");
        assert_eq!(series[0].start, NaiveDate::from_ymd_opt(2012, 7, 1).unwrap());
        assert_eq!(series[0].total_occurrences, 6);
        assert_eq!(series[0].percentage_occurrences, 50.0);
        // No totals entry for 2012-08: percentage falls back to 0
        assert_eq!(series[1].period, "2012-08");
        assert_eq!(series[1].percentage_occurrences, 0.0);
    }

    #[test]
    fn excluded_periods_are_dropped() {
        let records = vec![
            record("x", Some((2007, 3, 20)), "A", 9),
            record("x", Some((2007, 4, 3)), "B", 1),
        ];
        let mut totals = PeriodTotals::default();
        totals.phrases.insert("2007-04".into(), 10);
        totals.documents.insert("2007-04".into(), 1);
        let excluded = vec!["2007-03".to_string()];
        let series = aggregate_series(&records, Granularity::Monthly, &totals, &excluded);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].period, "2007-04");
    }

    #[test]
    fn percentages_stay_within_bounds() {
        let records: Vec<PhraseRecord> = (0..20)
            .map(|i| record("x", Some((2010, 1 + (i % 12) as u32, 1)), &format!("D{}", i), i))
            .collect();
        let totals = totals_2010(1000, 100);
        for point in aggregate_series(&records, Granularity::Yearly, &totals, &[]) {
            assert!((0.0..=100.0).contains(&point.percentage_occurrences));
            assert!((0.0..=100.0).contains(&point.percentage_documents));
        }
    }

    #[test]
    fn window_grouping_filters_and_normalizes() {
        let records = vec![
            record("alpha", Some((2010, 1, 1)), "A", 6),
            record("alpha", Some((2010, 2, 1)), "B", 2),
            record("beta", Some((2010, 1, 1)), "A", 2),
            // denylisted rows
            record("#bad", Some((2010, 1, 1)), "A", 50),
            record("42", Some((2010, 1, 1)), "A", 50),
        ];
        let rows = group_by_phrase(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].phrase, "alpha");
        assert_eq!(rows[0].total_occurrences, 8);
        assert_eq!(rows[0].total_docs, 2);
        assert_eq!(rows[0].percentage_occurrences, 80.0);
        assert_eq!(rows[1].phrase, "beta");
        assert_eq!(rows[1].percentage_occurrences, 20.0);
        // round-trip of the normalization step
        let sum: f64 = rows.iter().map(|r| r.percentage_occurrences).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }
}

//! End-to-end tests of the aggregation pipeline over real files:
//! totals persistence, series aggregation, and TSV output.

use chrono::NaiveDate;

use npt_common::aggregate::aggregate_series;
use npt_common::solr::PhraseRecord;
use npt_common::totals::PeriodTotals;
use npt_common::tsv::{self, TsvTable};
use npt_common::Granularity;

fn record(phrase: &str, date: &str, doc: &str, occurrences: u64) -> PhraseRecord {
    PhraseRecord {
        phrase: phrase.to_string(),
        published_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        document_id: doc.to_string(),
        num_occurrences: occurrences,
    }
}

#[test]
fn totals_survive_a_save_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("totals.json");

    let mut totals = PeriodTotals::default();
    totals.phrases.insert("2010-01".to_string(), 1000);
    totals.phrases.insert("2010-02".to_string(), 2000);
    totals.documents.insert("2010-01".to_string(), 50);
    totals.documents.insert("2010-02".to_string(), 80);
    totals.save(&path).unwrap();

    let loaded = PeriodTotals::load(&path).unwrap();
    assert_eq!(loaded, totals);
}

#[test]
fn aggregation_normalizes_against_loaded_totals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("totals.json");

    let mut totals = PeriodTotals::default();
    totals.phrases.insert("2010-01".to_string(), 200);
    totals.documents.insert("2010-01".to_string(), 10);
    totals.save(&path).unwrap();
    let totals = PeriodTotals::load(&path).unwrap();

    let records = vec![
        record("svm", "2010-01-05", "1001.0001", 6),
        record("svm", "2010-01-20", "1001.0002", 4),
    ];
    let points = aggregate_series(&records, Granularity::Monthly, &totals, &[]);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].period, "2010-01");
    assert_eq!(points[0].total_occurrences, 10);
    assert_eq!(points[0].document_frequency, 2);
    assert!((points[0].percentage_occurrences - 5.0).abs() < 1e-12);
    assert!((points[0].percentage_documents - 20.0).abs() < 1e-12);
}

#[test]
fn periods_missing_from_totals_report_zero_percent() {
    let totals = PeriodTotals::default();
    let records = vec![record("svm", "2011-06-01", "1106.0001", 3)];
    let points = aggregate_series(&records, Granularity::Yearly, &totals, &[]);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].percentage_occurrences, 0.0);
    assert_eq!(points[0].percentage_documents, 0.0);
}

#[test]
fn tsv_tables_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = TsvTable::new(vec!["phrase", "total_occurrences"]);
    table.push_row(vec!["machine learning".to_string(), "123".to_string()]);
    table.push_row(vec!["svm".to_string(), "99".to_string()]);

    let path = tsv::write_table(dir.path(), "counts.tsv", &table).unwrap();
    let loaded = tsv::read_table(&path).unwrap();
    assert_eq!(loaded.columns, table.columns);
    assert_eq!(loaded.rows, table.rows);
}

//! Trend report: Mann-Kendall + Theil-Sen over the wide table, split into
//! five sorted output tables
//!
//! - increasing_mannkendall.tsv (Z descending)
//! - decreasing_mannkendall.tsv (Z ascending: strongest negatives first)
//! - no_trend_mannkendall.tsv (p ascending: closest to significance first)
//! - positive_theilsen.tsv (slope descending)
//! - negative_theilsen.tsv (slope ascending)

use std::path::Path;

use npt_common::tsv::{fmt_pct, write_table, TsvTable};
use npt_common::Result;

use crate::stats::{mann_kendall, theil_sen, MannKendall, TheilSen, Trend};
use crate::widetable::{year_columns, WideTable};

const ALPHA: f64 = 0.05;
const CONFIDENCE: f64 = 0.95;

/// One phrase with both trend statistics attached
#[derive(Debug, Clone)]
pub struct TrendRow {
    pub phrase: String,
    pub total_occurrences: u64,
    pub total_documents: u64,
    pub percentages: Vec<f64>,
    pub mk: MannKendall,
    pub ts: TheilSen,
}

/// Compute both statistics for every row of the wide table
pub fn compute_trends(table: &WideTable) -> Vec<TrendRow> {
    table
        .rows
        .iter()
        .map(|row| TrendRow {
            phrase: row.phrase.clone(),
            total_occurrences: row.total_occurrences,
            total_documents: row.total_documents,
            percentages: row.percentages.clone(),
            mk: mann_kendall(&row.percentages, ALPHA),
            ts: theil_sen(&row.percentages, CONFIDENCE),
        })
        .collect()
}

/// The five sorted views over the computed rows
pub struct TrendTables {
    pub increasing_mk: Vec<TrendRow>,
    pub decreasing_mk: Vec<TrendRow>,
    pub no_trend_mk: Vec<TrendRow>,
    pub positive_theilsen: Vec<TrendRow>,
    pub negative_theilsen: Vec<TrendRow>,
}

/// Split and sort the rows into the five output tables
pub fn split_tables(rows: Vec<TrendRow>) -> TrendTables {
    let mut increasing_mk: Vec<TrendRow> = rows
        .iter()
        .filter(|r| r.mk.trend == Trend::Increasing)
        .cloned()
        .collect();
    increasing_mk.sort_by(|a, b| cmp_f64(b.mk.z, a.mk.z));

    let mut decreasing_mk: Vec<TrendRow> = rows
        .iter()
        .filter(|r| r.mk.trend == Trend::Decreasing)
        .cloned()
        .collect();
    decreasing_mk.sort_by(|a, b| cmp_f64(a.mk.z, b.mk.z));

    let mut no_trend_mk: Vec<TrendRow> = rows
        .iter()
        .filter(|r| r.mk.trend == Trend::NoTrend)
        .cloned()
        .collect();
    no_trend_mk.sort_by(|a, b| cmp_f64(a.mk.p, b.mk.p));

    let mut positive_theilsen: Vec<TrendRow> =
        rows.iter().filter(|r| r.ts.slope > 0.0).cloned().collect();
    positive_theilsen.sort_by(|a, b| cmp_f64(b.ts.slope, a.ts.slope));

    let mut negative_theilsen: Vec<TrendRow> =
        rows.iter().filter(|r| r.ts.slope < 0.0).cloned().collect();
    negative_theilsen.sort_by(|a, b| cmp_f64(a.ts.slope, b.ts.slope));

    TrendTables {
        increasing_mk,
        decreasing_mk,
        no_trend_mk,
        positive_theilsen,
        negative_theilsen,
    }
}

fn cmp_f64(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

/// Write the five tables under `<output>/<subfolder>/`
pub fn write_trend_tables(
    tables: &TrendTables,
    wide: &WideTable,
    output_folder: &Path,
    subfolder: &str,
) -> Result<()> {
    let dir = output_folder.join(subfolder);
    let files = [
        ("increasing_mannkendall.tsv", &tables.increasing_mk),
        ("decreasing_mannkendall.tsv", &tables.decreasing_mk),
        ("no_trend_mannkendall.tsv", &tables.no_trend_mk),
        ("positive_theilsen.tsv", &tables.positive_theilsen),
        ("negative_theilsen.tsv", &tables.negative_theilsen),
    ];
    for (filename, rows) in files {
        write_table(&dir, filename, &render_rows(rows, wide))?;
    }
    Ok(())
}

fn render_rows(rows: &[TrendRow], wide: &WideTable) -> TsvTable {
    let mut columns = vec![
        "phrase".to_string(),
        "total_occurrences".to_string(),
        "total_documents".to_string(),
    ];
    columns.extend(year_columns(&wide.metric_prefix, &wide.years));
    columns.extend(
        [
            "mannkendall_z",
            "mannkendall_pvalue",
            "trend_type",
            "theilsen_slope",
            "theilsen_lower_ci",
            "theilsen_upper_ci",
        ]
        .map(String::from),
    );

    let mut table = TsvTable::new(columns);
    for row in rows {
        let mut cells = vec![
            row.phrase.clone(),
            row.total_occurrences.to_string(),
            row.total_documents.to_string(),
        ];
        cells.extend(row.percentages.iter().map(|&p| fmt_pct(p)));
        cells.push(fmt_pct(row.mk.z));
        cells.push(fmt_pct(row.mk.p));
        cells.push(row.mk.trend.as_str().to_string());
        cells.push(fmt_pct(row.ts.slope));
        cells.push(fmt_pct(row.ts.lower));
        cells.push(fmt_pct(row.ts.upper));
        table.push_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widetable::WideRow;

    fn wide_with(rows: Vec<(&str, Vec<f64>)>) -> WideTable {
        WideTable {
            years: (2007..2018).collect(),
            metric_prefix: "percentage_occurrences".to_string(),
            rows: rows
                .into_iter()
                .map(|(phrase, percentages)| WideRow {
                    phrase: phrase.to_string(),
                    total_occurrences: 1000,
                    total_documents: 500,
                    percentages,
                })
                .collect(),
        }
    }

    #[test]
    fn rows_land_in_matching_tables() {
        let up: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let down: Vec<f64> = (0..11).rev().map(|i| i as f64).collect();
        let flat = vec![2.0; 11];
        let wide = wide_with(vec![("up", up), ("down", down), ("flat", flat)]);

        let tables = split_tables(compute_trends(&wide));
        assert_eq!(tables.increasing_mk.len(), 1);
        assert_eq!(tables.increasing_mk[0].phrase, "up");
        assert_eq!(tables.decreasing_mk.len(), 1);
        assert_eq!(tables.decreasing_mk[0].phrase, "down");
        assert_eq!(tables.no_trend_mk.len(), 1);
        assert_eq!(tables.no_trend_mk[0].phrase, "flat");
        assert_eq!(tables.positive_theilsen.len(), 1);
        assert_eq!(tables.negative_theilsen.len(), 1);
    }

    #[test]
    fn increasing_table_is_sorted_by_z_descending() {
        let strong: Vec<f64> = (0..11).map(|i| i as f64).collect();
        // weaker monotone signal with a few reversals
        let weak = vec![0.0, 1.0, 0.5, 2.0, 1.5, 3.0, 2.5, 4.0, 3.5, 5.0, 6.0];
        let wide = wide_with(vec![("weak", weak), ("strong", strong)]);

        let tables = split_tables(compute_trends(&wide));
        assert_eq!(tables.increasing_mk.len(), 2);
        assert_eq!(tables.increasing_mk[0].phrase, "strong");
        assert!(tables.increasing_mk[0].mk.z >= tables.increasing_mk[1].mk.z);
    }

    #[test]
    fn written_tables_exist_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let wide = wide_with(vec![("up", (0..11).map(|i| i as f64).collect())]);
        let tables = split_tables(compute_trends(&wide));
        write_trend_tables(&tables, &wide, dir.path(), "mannkendall_and_theilsen").unwrap();
        for file in [
            "increasing_mannkendall.tsv",
            "decreasing_mannkendall.tsv",
            "no_trend_mannkendall.tsv",
            "positive_theilsen.tsv",
            "negative_theilsen.tsv",
        ] {
            assert!(dir.path().join("mannkendall_and_theilsen").join(file).exists());
        }
    }
}

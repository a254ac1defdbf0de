//! The per-phrase wide table: one row per phrase, one percentage column
//! per year
//!
//! Built by joining the corpus-wide counts (from `npt-ix count`) with one
//! per-year percentage table per year in the configured range. Years in
//! which a phrase was not observed are filled with 0. Phrases below the
//! occurrence floor, phrases failing the denylist, and phrases observed
//! in fewer than `min_periods` distinct years are dropped before any
//! trend statistic is computed.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use npt_common::aggregate::PhraseWindowRow;
use npt_common::config::Config;
use npt_common::period::year_bounds;
use npt_common::phrases;
use npt_common::solr::{Collection, SolrClient};
use npt_common::tsv::{self, fmt_pct, TsvTable};
use npt_common::{Error, Result};

/// Which normalized series the wide table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Percent of all phrase occurrences per year
    Occurrences,
    /// Percent of all documents per year
    Documents,
}

impl Metric {
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Metric::Occurrences => "percentage_occurrences",
            Metric::Documents => "percentage_docs",
        }
    }

    fn pick(&self, row: &PhraseWindowRow) -> f64 {
        match self {
            Metric::Occurrences => row.percentage_occurrences,
            Metric::Documents => row.percentage_docs,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "occurrences" => Ok(Metric::Occurrences),
            "documents" | "docs" => Ok(Metric::Documents),
            other => Err(Error::InvalidInput(format!("unknown metric: {}", other))),
        }
    }
}

/// One phrase's corpus totals plus its yearly percentage series
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub phrase: String,
    pub total_occurrences: u64,
    pub total_documents: u64,
    /// One value per year, aligned with [`WideTable::years`]
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub years: Vec<i32>,
    pub metric_prefix: String,
    pub rows: Vec<WideRow>,
}

/// Corpus totals for one phrase (inner join of the two count tables)
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusRow {
    pub phrase: String,
    pub total_occurrences: u64,
    pub total_documents: u64,
}

/// Read and join the two corpus count tables written by `npt-ix count`,
/// dropping denylisted phrases
pub fn read_corpus_counts(output_folder: &Path) -> Result<Vec<CorpusRow>> {
    let occurrences = read_count_table(&output_folder.join("phrase_counts.tsv"))?;
    let documents = read_count_table(&output_folder.join("document_counts.tsv"))?;

    let mut rows: Vec<CorpusRow> = occurrences
        .into_iter()
        .filter(|(phrase, _)| phrases::is_reportable(phrase))
        .filter_map(|(phrase, total)| {
            documents.get(&phrase).map(|&docs| CorpusRow {
                phrase,
                total_occurrences: total,
                total_documents: docs,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_occurrences
            .cmp(&a.total_occurrences)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });
    Ok(rows)
}

fn read_count_table(path: &Path) -> Result<HashMap<String, u64>> {
    let table = tsv::read_table(path)?;
    let mut counts = HashMap::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.len() < 2 {
            continue;
        }
        let count = row[1]
            .parse::<u64>()
            .map_err(|_| Error::InvalidInput(format!("{}: bad count `{}`", path.display(), row[1])))?;
        counts.insert(row[0].clone(), count);
    }
    Ok(counts)
}

/// Join corpus counts with the per-year percentage maps and apply the
/// occurrence-floor and minimum-periods filters
pub fn assemble(
    corpus: Vec<CorpusRow>,
    per_year: &[HashMap<String, f64>],
    years: Vec<i32>,
    metric: Metric,
    occurrence_floor: u64,
    min_periods: usize,
) -> WideTable {
    debug_assert_eq!(per_year.len(), years.len());
    let rows = corpus
        .into_iter()
        .filter(|row| row.total_occurrences >= occurrence_floor)
        .filter_map(|row| {
            let percentages: Vec<f64> = per_year
                .iter()
                .map(|year_map| year_map.get(&row.phrase).copied().unwrap_or(0.0))
                .collect();
            let observed = percentages.iter().filter(|&&p| p != 0.0).count();
            if observed < min_periods {
                return None;
            }
            Some(WideRow {
                phrase: row.phrase,
                total_occurrences: row.total_occurrences,
                total_documents: row.total_documents,
                percentages,
            })
        })
        .collect();
    WideTable {
        years,
        metric_prefix: metric.column_prefix().to_string(),
        rows,
    }
}

/// Query one year per configured year and build the wide table
pub async fn build(
    client: &SolrClient,
    config: &Config,
    collection: Collection,
    metric: Metric,
) -> Result<WideTable> {
    let corpus = read_corpus_counts(&config.output_folder)?;
    let years = config.trend_years();

    let mut per_year: Vec<HashMap<String, f64>> = Vec::with_capacity(years.len());
    for &year in &years {
        let Some((from, to)) = year_bounds(year) else {
            per_year.push(HashMap::new());
            continue;
        };
        let records = client
            .phrase_records_in_range(from, to, collection)
            .await?;
        let grouped = npt_common::aggregate::group_by_phrase(&records);
        info!(year, phrases = grouped.len(), "yearly percentages");
        per_year.push(
            grouped
                .into_iter()
                .map(|row| (row.phrase.clone(), metric.pick(&row)))
                .collect(),
        );
    }

    Ok(assemble(
        corpus,
        &per_year,
        years,
        metric,
        config.trends.occurrence_floor,
        config.trends.min_periods,
    ))
}

/// Year columns of the wide table (`percentage_occurrences_2007`, ...)
pub fn year_columns(prefix: &str, years: &[i32]) -> Vec<String> {
    years.iter().map(|y| format!("{}_{}", prefix, y)).collect()
}

/// Render the wide table as TSV (the clustering job's input)
pub fn to_tsv(table: &WideTable) -> TsvTable {
    let mut columns = vec![
        "phrase".to_string(),
        "total_occurrences".to_string(),
        "total_documents".to_string(),
    ];
    columns.extend(year_columns(&table.metric_prefix, &table.years));
    let mut tsv_table = TsvTable::new(columns);
    for row in &table.rows {
        let mut cells = vec![
            row.phrase.clone(),
            row.total_occurrences.to_string(),
            row.total_documents.to_string(),
        ];
        cells.extend(row.percentages.iter().map(|&p| fmt_pct(p)));
        tsv_table.push_row(cells);
    }
    tsv_table
}

/// Parse a wide table back from its TSV form
pub fn from_tsv(table: &TsvTable) -> Result<WideTable> {
    let phrase_col = table.column_index("phrase")?;
    let occ_col = table.column_index("total_occurrences")?;
    let doc_col = table.column_index("total_documents")?;

    // Year columns are everything after the three fixed columns
    let year_cols: Vec<usize> = (0..table.columns.len())
        .filter(|&i| i != phrase_col && i != occ_col && i != doc_col)
        .collect();
    let years: Vec<i32> = year_cols
        .iter()
        .map(|&i| {
            table.columns[i]
                .rsplit('_')
                .next()
                .and_then(|y| y.parse().ok())
                .ok_or_else(|| {
                    Error::InvalidInput(format!("bad year column: {}", table.columns[i]))
                })
        })
        .collect::<Result<_>>()?;
    let metric_prefix = year_cols
        .first()
        .map(|&i| {
            let name = &table.columns[i];
            name.rsplit_once('_')
                .map(|(prefix, _)| prefix.to_string())
                .unwrap_or_else(|| name.clone())
        })
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(table.rows.len());
    for cells in &table.rows {
        if cells.len() != table.columns.len() {
            return Err(Error::InvalidInput(format!(
                "row has {} cells, expected {}",
                cells.len(),
                table.columns.len()
            )));
        }
        let parse_u64 = |i: usize| -> Result<u64> {
            cells[i]
                .parse()
                .map_err(|_| Error::InvalidInput(format!("bad count: {}", cells[i])))
        };
        let percentages: Vec<f64> = year_cols
            .iter()
            .map(|&i| cells[i].parse().unwrap_or(0.0))
            .collect();
        rows.push(WideRow {
            phrase: cells[phrase_col].clone(),
            total_occurrences: parse_u64(occ_col)?,
            total_documents: parse_u64(doc_col)?,
            percentages,
        });
    }
    Ok(WideTable {
        years,
        metric_prefix,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_row(phrase: &str, occ: u64, docs: u64) -> CorpusRow {
        CorpusRow {
            phrase: phrase.to_string(),
            total_occurrences: occ,
            total_documents: docs,
        }
    }

    fn year_map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(phrase, p)| (phrase.to_string(), *p))
            .collect()
    }

    #[test]
    fn sparse_phrases_are_excluded() {
        let corpus = vec![corpus_row("dense", 500, 100), corpus_row("sparse", 400, 90)];
        let per_year = vec![
            year_map(&[("dense", 1.0), ("sparse", 2.0)]),
            year_map(&[("dense", 1.5)]),
            year_map(&[("dense", 2.0), ("sparse", 2.5)]),
            year_map(&[("dense", 2.5)]),
        ];
        let table = assemble(
            corpus,
            &per_year,
            vec![2010, 2011, 2012, 2013],
            Metric::Occurrences,
            100,
            3,
        );
        // "sparse" is non-zero in only 2 of 4 years
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].phrase, "dense");
        assert_eq!(table.rows[0].percentages, vec![1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn occurrence_floor_drops_rare_phrases() {
        let corpus = vec![corpus_row("common", 150, 50), corpus_row("rare", 99, 10)];
        let per_year = vec![
            year_map(&[("common", 1.0), ("rare", 1.0)]),
            year_map(&[("common", 1.0), ("rare", 1.0)]),
            year_map(&[("common", 1.0), ("rare", 1.0)]),
        ];
        let table = assemble(
            corpus,
            &per_year,
            vec![2010, 2011, 2012],
            Metric::Occurrences,
            100,
            3,
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].phrase, "common");
    }

    #[test]
    fn missing_years_are_zero_filled() {
        let corpus = vec![corpus_row("x", 500, 100)];
        let per_year = vec![
            year_map(&[("x", 1.0)]),
            year_map(&[]),
            year_map(&[("x", 2.0)]),
            year_map(&[("x", 3.0)]),
        ];
        let table = assemble(
            corpus,
            &per_year,
            vec![2010, 2011, 2012, 2013],
            Metric::Occurrences,
            0,
            3,
        );
        assert_eq!(table.rows[0].percentages, vec![1.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn truncated_rows_are_rejected() {
        let mut table = TsvTable::new(vec![
            "phrase",
            "total_occurrences",
            "total_documents",
            "percentage_occurrences_2010",
        ]);
        table.push_row(vec!["x", "10", "5", "1.5"]);
        // hand-edited file with a cut-off row
        table.push_row(vec!["y", "3"]);
        let err = from_tsv(&table).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn tsv_round_trip() {
        let table = WideTable {
            years: vec![2010, 2011],
            metric_prefix: "percentage_occurrences".to_string(),
            rows: vec![WideRow {
                phrase: "x".to_string(),
                total_occurrences: 10,
                total_documents: 5,
                percentages: vec![1.25, 0.0],
            }],
        };
        let rendered = to_tsv(&table);
        assert_eq!(rendered.columns[3], "percentage_occurrences_2010");
        let parsed = from_tsv(&rendered).unwrap();
        assert_eq!(parsed.years, table.years);
        assert_eq!(parsed.rows[0].phrase, "x");
        assert_eq!(parsed.rows[0].percentages, vec![1.25, 0.0]);
    }
}

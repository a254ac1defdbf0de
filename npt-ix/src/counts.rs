//! Corpus counting job
//!
//! Walks the noun-phrase corpus once and produces two tables: the total
//! number of occurrences of each phrase across all files, and the number
//! of distinct documents in which each phrase appears. Both are persisted
//! as sorted TSV tables and serve as the corpus-wide denominators and
//! join base for the trend jobs.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use npt_common::tsv::{write_table, TsvTable};
use npt_common::Result;

use crate::npfiles;

pub const PHRASE_COUNTS_FILE: &str = "phrase_counts.tsv";
pub const DOCUMENT_COUNTS_FILE: &str = "document_counts.tsv";

/// Corpus-wide counters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CorpusCounts {
    /// phrase → total occurrences in the corpus
    pub occurrences: HashMap<String, u64>,
    /// phrase → number of distinct documents containing it
    pub documents: HashMap<String, u64>,
}

/// Count every phrase in every noun-phrase file under `folder`
pub fn count_corpus(folder: &Path) -> Result<CorpusCounts> {
    let paths = npfiles::np_file_paths(folder);
    info!(files = paths.len(), folder = %folder.display(), "counting corpus");
    let mut counts = CorpusCounts::default();
    for path in &paths {
        let file_counts = npfiles::read_np_file(path)?;
        for (phrase, frequency) in file_counts {
            *counts.occurrences.entry(phrase.clone()).or_insert(0) += frequency;
            // one per file regardless of frequency
            *counts.documents.entry(phrase).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Write both counters as TSV tables, sorted by count descending
pub fn write_counts(counts: &CorpusCounts, output_folder: &Path) -> Result<()> {
    write_counter(
        &counts.occurrences,
        &["phrase", "total_occurrences"],
        output_folder,
        PHRASE_COUNTS_FILE,
    )?;
    write_counter(
        &counts.documents,
        &["phrase", "total_documents"],
        output_folder,
        DOCUMENT_COUNTS_FILE,
    )?;
    Ok(())
}

fn write_counter(
    counter: &HashMap<String, u64>,
    columns: &[&str],
    output_folder: &Path,
    filename: &str,
) -> Result<()> {
    let mut entries: Vec<(&String, &u64)> = counter.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let mut table = TsvTable::new(columns.to_vec());
    for (phrase, count) in entries {
        table.push_row(vec![phrase.clone(), count.to_string()]);
    }
    write_table(output_folder, filename, &table)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences_and_documents_separately() {
        let dir = tempfile::tempdir().unwrap();
        // doc A: x appears 3 times, y once; doc B: x appears 5 times
        std::fs::write(dir.path().join("1001.0001.nps.txt"), "x\t0\t1\nx\t2\t3\nx\t4\t5\ny\t6\t7\n")
            .unwrap();
        std::fs::write(
            dir.path().join("1001.0002.nps.txt"),
            "x\t0\t1\nx\t2\t3\nx\t4\t5\nx\t6\t7\nx\t8\t9\n",
        )
        .unwrap();

        let counts = count_corpus(dir.path()).unwrap();
        assert_eq!(counts.occurrences.get("x"), Some(&8));
        assert_eq!(counts.occurrences.get("y"), Some(&1));
        assert_eq!(counts.documents.get("x"), Some(&2));
        assert_eq!(counts.documents.get("y"), Some(&1));
    }

    #[test]
    fn writes_sorted_tables() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        std::fs::create_dir(&corpus).unwrap();
        std::fs::write(corpus.join("1.0.nps.txt"), "rare\t0\t1\ncommon\t2\t3\ncommon\t4\t5\n")
            .unwrap();

        let counts = count_corpus(&corpus).unwrap();
        let out = dir.path().join("out");
        write_counts(&counts, &out).unwrap();

        let table = npt_common::tsv::read_table(&out.join(PHRASE_COUNTS_FILE)).unwrap();
        assert_eq!(table.columns, vec!["phrase", "total_occurrences"]);
        assert_eq!(table.rows[0], vec!["common", "2"]);
        assert_eq!(table.rows[1], vec!["rare", "1"]);
    }
}

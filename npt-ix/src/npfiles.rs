//! Parsing of per-document noun-phrase annotation files
//!
//! Each corpus document has one `<id>.nps.txt` file with tab-separated
//! lines `phrase<TAB>start<TAB>end`; only the phrase is used. Phrases are
//! lower-cased and trimmed, empty phrases are skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use npt_common::Result;

/// File name suffix of noun-phrase annotation files
pub const NP_SUFFIX: &str = ".nps.txt";

/// All noun-phrase files under a folder, in walk order
pub fn np_file_paths(folder: &Path) -> Vec<PathBuf> {
    WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(NP_SUFFIX))
        .map(|entry| entry.into_path())
        .collect()
}

/// Document id from a noun-phrase file name: the first two dot-separated
/// parts (`1207.1234.nps.txt` → `1207.1234`)
pub fn document_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts[..2].join("."))
}

/// Per-file phrase frequencies: phrase → number of occurrences in this
/// document
pub fn read_np_file(path: &Path) -> Result<HashMap<String, u64>> {
    let content = std::fs::read_to_string(path)?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for line in content.lines() {
        let phrase = line
            .split('\t')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        if phrase.is_empty() {
            continue;
        }
        *counts.entry(phrase).or_insert(0) += 1;
    }
    Ok(counts)
}

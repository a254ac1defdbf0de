//! Tab-separated flat-file outputs under `Output/<subfolder>/`

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Error, Result};

/// An in-memory TSV table: a header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsvTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TsvTable {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: Vec<S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Index of a named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::InvalidInput(format!("missing column: {}", name)))
    }
}

/// Write a table to `<dir>/<filename>`, creating the directory if needed
pub fn write_table(dir: &Path, filename: &str, table: &TsvTable) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let mut file = std::io::BufWriter::new(std::fs::File::create(&path)?);
    writeln!(file, "{}", table.columns.join("\t"))?;
    for row in &table.rows {
        writeln!(file, "{}", row.join("\t"))?;
    }
    file.flush()?;
    info!(path = %path.display(), rows = table.rows.len(), "wrote table");
    Ok(path)
}

/// Read a TSV file written by [`write_table`] (first line is the header)
pub fn read_table(path: &Path) -> Result<TsvTable> {
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines();
    let columns = match lines.next() {
        Some(header) => header.split('\t').map(String::from).collect(),
        None => return Err(Error::InvalidInput(format!("{}: empty file", path.display()))),
    };
    let rows = lines
        .filter(|line| !line.is_empty())
        .map(|line| line.split('\t').map(String::from).collect())
        .collect();
    Ok(TsvTable { columns, rows })
}

/// Format a percentage column value
pub fn fmt_pct(value: f64) -> String {
    format!("{:.6}", value)
}

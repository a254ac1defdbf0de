//! Per-period denominators used to normalize raw counts into percentages
//!
//! The period-totals file is a JSON array of exactly two objects: the first
//! maps period keys to the total number of phrase occurrences in the period,
//! the second maps period keys to the total number of documents. The file is
//! precomputed by `npt-ix totals` and read-only at query time.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{Error, Result};

/// Period key → (total phrase occurrences, total documents) lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTotals {
    pub phrases: BTreeMap<String, u64>,
    pub documents: BTreeMap<String, u64>,
}

impl PeriodTotals {
    /// Load a two-object JSON array totals file
    pub fn load(path: &Path) -> Result<PeriodTotals> {
        let content = std::fs::read_to_string(path)?;
        let mut objects: Vec<BTreeMap<String, u64>> = serde_json::from_str(&content)?;
        if objects.len() != 2 {
            return Err(Error::Config(format!(
                "{}: expected a JSON array of exactly 2 objects, found {}",
                path.display(),
                objects.len()
            )));
        }
        let documents = objects.pop().unwrap_or_default();
        let phrases = objects.pop().unwrap_or_default();
        Ok(PeriodTotals { phrases, documents })
    }

    /// Write the two-object JSON array totals file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let array = vec![&self.phrases, &self.documents];
        std::fs::write(path, serde_json::to_string(&array)?)?;
        Ok(())
    }

    /// Percentage of the period's phrase occurrences
    pub fn phrase_percentage(&self, period_key: &str, value: u64) -> f64 {
        percentage(value, self.phrases.get(period_key))
    }

    /// Percentage of the period's documents
    pub fn document_percentage(&self, period_key: &str, value: u64) -> f64 {
        percentage(value, self.documents.get(period_key))
    }

    /// Fold monthly totals (`YYYY-MM` keys) into yearly totals (`YYYY` keys)
    pub fn rollup_yearly(&self) -> PeriodTotals {
        PeriodTotals {
            phrases: rollup(&self.phrases),
            documents: rollup(&self.documents),
        }
    }
}

/// `100 * value / total`, with 0 substituted when the total is zero or the
/// period key is absent (divide-by-zero convention)
pub fn percentage(value: u64, total: Option<&u64>) -> f64 {
    match total {
        Some(&t) if t > 0 => 100.0 * value as f64 / t as f64,
        _ => 0.0,
    }
}

fn rollup(monthly: &BTreeMap<String, u64>) -> BTreeMap<String, u64> {
    let mut yearly: BTreeMap<String, u64> = BTreeMap::new();
    for (key, count) in monthly {
        // "2012-07" → "2012"
        let year = key.split('-').next().unwrap_or(key);
        *yearly.entry(year.to_string()).or_insert(0) += count;
    }
    yearly
}

//! Period-totals generation
//!
//! Builds the per-period denominator tables used by the normalization
//! step: one date-range query per calendar month, summing occurrences and
//! counting distinct documents, written as the two-object JSON array. The
//! yearly file is a pure rollup of the monthly one and needs no further
//! queries.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use npt_common::period::month_bounds;
use npt_common::solr::{Collection, SolrClient};
use npt_common::totals::PeriodTotals;
use npt_common::{Error, Result};

/// Query the index month by month and build the monthly totals table
pub async fn build_monthly_totals(
    client: &SolrClient,
    collection: Collection,
    years: &[i32],
) -> Result<PeriodTotals> {
    let mut totals = PeriodTotals::default();
    for &year in years {
        for month in 1..=12 {
            let Some((first, last)) = month_bounds(year, month) else {
                continue;
            };
            let records = client
                .phrase_records_in_range(first, last, collection)
                .await?;
            let occurrence_sum: u64 = records.iter().map(|r| r.num_occurrences).sum();
            let distinct_docs: HashSet<&str> = records
                .iter()
                .map(|r| r.document_id.as_str())
                .filter(|id| !id.is_empty())
                .collect();
            let key = format!("{:04}-{:02}", year, month);
            info!(
                period = %key,
                occurrences = occurrence_sum,
                documents = distinct_docs.len(),
                "monthly totals"
            );
            totals.phrases.insert(key.clone(), occurrence_sum);
            totals.documents.insert(key, distinct_docs.len() as u64);
        }
    }
    Ok(totals)
}

/// Fold an existing monthly totals file into a yearly one
pub fn rollup_monthly_file(monthly_path: &Path, yearly_path: &Path) -> Result<()> {
    let monthly = PeriodTotals::load(monthly_path)?;
    if monthly.phrases.is_empty() {
        return Err(Error::InvalidInput(format!(
            "{}: monthly totals file has no periods",
            monthly_path.display()
        )));
    }
    let yearly = monthly.rollup_yearly();
    yearly.save(yearly_path)?;
    info!(
        months = monthly.phrases.len(),
        years = yearly.phrases.len(),
        path = %yearly_path.display(),
        "rolled up monthly totals"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollup_writes_yearly_file() {
        let dir = tempfile::tempdir().unwrap();
        let monthly_path = dir.path().join("monthly.json");
        let yearly_path = dir.path().join("yearly.json");

        let mut monthly = PeriodTotals::default();
        monthly.phrases.insert("2010-01".into(), 5);
        monthly.phrases.insert("2010-02".into(), 7);
        monthly.documents.insert("2010-01".into(), 2);
        monthly.documents.insert("2010-02".into(), 3);
        monthly.save(&monthly_path).unwrap();

        rollup_monthly_file(&monthly_path, &yearly_path).unwrap();

        let yearly = PeriodTotals::load(&yearly_path).unwrap();
        assert_eq!(yearly.phrases.get("2010"), Some(&12));
        assert_eq!(yearly.documents.get("2010"), Some(&5));
    }

    #[test]
    fn rollup_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let monthly_path = dir.path().join("monthly.json");
        PeriodTotals::default().save(&monthly_path).unwrap();
        assert!(rollup_monthly_file(&monthly_path, &dir.path().join("yearly.json")).is_err());
    }
}

//! Shared application state for the dashboard
//!
//! Totals and suggestions are loaded once at startup. Both totals files
//! are required (without the denominators every percentage would be 0);
//! the suggestion list is optional and degrades to an empty list.

use std::path::Path;

use tracing::{info, warn};

use npt_common::config::Config;
use npt_common::solr::SolrClient;
use npt_common::totals::PeriodTotals;
use npt_common::Result;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub client: SolrClient,
    /// Per-month denominators keyed `YYYY-MM`
    pub monthly_totals: PeriodTotals,
    /// Per-year denominators keyed `YYYY`
    pub yearly_totals: PeriodTotals,
    /// Period keys dropped from every series
    pub excluded_periods: Vec<String>,
    /// Phrases offered to the dashboard's autocomplete box
    pub suggestions: Vec<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<AppState> {
        let monthly_totals = PeriodTotals::load(&config.monthly_totals_file)?;
        let yearly_totals = PeriodTotals::load(&config.yearly_totals_file)?;
        let suggestions = load_suggestions(&config.suggestions_file);
        info!(
            months = monthly_totals.phrases.len(),
            years = yearly_totals.phrases.len(),
            suggestions = suggestions.len(),
            "dashboard state loaded"
        );
        Ok(AppState {
            client: SolrClient::new(&config.solr_url),
            monthly_totals,
            yearly_totals,
            excluded_periods: config.excluded_periods.clone(),
            suggestions,
        })
    }
}

/// First tab-separated field per line, header row dropped. A missing
/// file only disables autocomplete.
fn load_suggestions(path: &Path) -> Vec<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), %err, "no suggestion list");
            return Vec::new();
        }
    };
    text.lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|term| !term.is_empty() && *term != "phrase")
        .map(str::to_string)
        .collect()
}

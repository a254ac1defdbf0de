//! Configuration loading and config file resolution
//!
//! Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `NPTRENDS_CONFIG` environment variable
//! 3. `~/.config/nptrends/config.toml`, then `/etc/nptrends/config.toml`
//! 4. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration shared by all jobs and services
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Solr instance, without a trailing slash
    pub solr_url: String,
    /// Folder containing the per-document noun-phrase files (`*.nps.txt`)
    pub np_files_folder: PathBuf,
    /// Root folder for flat-file outputs (`Output/<subfolder>/...`)
    pub output_folder: PathBuf,
    /// Period-totals file with monthly denominators (two-object JSON array)
    pub monthly_totals_file: PathBuf,
    /// Period-totals file with yearly denominators (two-object JSON array)
    pub yearly_totals_file: PathBuf,
    /// Suggestion phrase list for the dashboard (one phrase per TSV line)
    pub suggestions_file: PathBuf,
    /// Period keys excluded from aggregation output. Degenerate buckets
    /// (e.g. a partial first month with 2 source documents) distort the
    /// percentage scale, so they are dropped by key instead of by a
    /// hardcoded date filter.
    pub excluded_periods: Vec<String>,
    pub trends: TrendsConfig,
    pub cluster: ClusterConfig,
    /// Listen port of the frequency dashboard (npt-viz)
    pub viz_port: u16,
    /// Listen port of the paper-search service (npt-ps)
    pub ps_port: u16,
}

/// Parameters of the trend-statistics jobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// Minimum number of distinct periods a phrase must be observed in
    /// before trend statistics are computed for it
    pub min_periods: usize,
    /// Phrases with fewer corpus-wide occurrences than this are dropped
    pub occurrence_floor: u64,
}

/// Parameters of the clustering job
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub clusters: usize,
    /// RNG seed: the same seed on the same input yields the same assignment
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            solr_url: "http://localhost:8983".to_string(),
            np_files_folder: PathBuf::from("NPFiles"),
            output_folder: PathBuf::from("Output"),
            monthly_totals_file: PathBuf::from("phrases_and_docs_monthly.json"),
            yearly_totals_file: PathBuf::from("phrases_and_docs_yearly.json"),
            suggestions_file: PathBuf::from("suggestions.tsv"),
            excluded_periods: vec!["2007-03".to_string()],
            trends: TrendsConfig::default(),
            cluster: ClusterConfig::default(),
            viz_port: 8060,
            ps_port: 8000,
        }
    }
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            start_year: 2007,
            end_year: 2017,
            min_periods: 3,
            occurrence_floor: 100,
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { clusters: 10, seed: 42 }
    }
}

impl Config {
    /// Load configuration following the resolution priority order.
    /// A path given explicitly (CLI or env) must exist; the fallback
    /// locations are optional and the compiled defaults apply when no
    /// config file is present.
    pub fn load(cli_arg: Option<&Path>) -> Result<Config> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Self::from_file(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var("NPTRENDS_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        // Priority 3: platform config locations
        if let Some(path) = find_config_file() {
            return Self::from_file(&path);
        }

        // Priority 4: compiled defaults
        Ok(Config::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Years covered by the trend jobs, in ascending order
    pub fn trend_years(&self) -> Vec<i32> {
        (self.trends.start_year..=self.trends.end_year).collect()
    }
}

/// Locate an existing config file in the standard locations
fn find_config_file() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("nptrends").join("config.toml")) {
        if user_config.exists() {
            return Some(user_config);
        }
    }
    let system_config = PathBuf::from("/etc/nptrends/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.solr_url, "http://localhost:8983");
        assert_eq!(config.trends.min_periods, 3);
        assert_eq!(config.trends.occurrence_floor, 100);
        assert_eq!(config.cluster.clusters, 10);
        assert_eq!(config.excluded_periods, vec!["2007-03".to_string()]);
        assert_eq!(config.trend_years().len(), 11);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            solr_url = "http://solr.internal:8983"

            [trends]
            start_year = 2010
            end_year = 2012
            "#,
        )
        .unwrap();
        assert_eq!(parsed.solr_url, "http://solr.internal:8983");
        assert_eq!(parsed.trend_years(), vec![2010, 2011, 2012]);
        // Untouched sections keep their defaults
        assert_eq!(parsed.cluster.seed, 42);
        assert_eq!(parsed.viz_port, 8060);
    }
}

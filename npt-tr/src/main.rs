//! npt-tr - trend statistics and clustering jobs
//!
//! Subcommands:
//! - `trend`: build the per-phrase yearly wide table, then the five
//!   Mann-Kendall / Theil-Sen output tables
//! - `delta`: percentage change between two date windows
//! - `cluster`: seeded k-means over the wide table's yearly shapes

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use npt_common::config::Config;
use npt_common::solr::{Collection, SolrClient};
use npt_common::tsv;
use npt_tr::widetable::Metric;
use npt_tr::{cluster, delta, report, widetable};

const WIDE_TABLE_FILE: &str = "yearly_percentages.tsv";

#[derive(Parser)]
#[command(name = "npt-tr", about = "Trend statistics and clustering jobs")]
struct Cli {
    /// Path to the config file (overrides NPTRENDS_CONFIG and defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the yearly wide table and the five sorted trend tables
    Trend {
        /// Normalized series to test: occurrences or documents
        #[arg(long, default_value = "occurrences")]
        metric: Metric,
        /// Output subfolder under the configured output folder
        #[arg(long, default_value = "mannkendall_and_theilsen")]
        subfolder: String,
        /// Use entity mentions instead of noun phrases
        #[arg(long)]
        entities: bool,
    },
    /// Report percentage change between two date windows
    Delta {
        /// Earlier window start (defaults to Sep 1 of the first year)
        #[arg(long)]
        earlier_from: Option<NaiveDate>,
        /// Earlier window end (defaults to Dec 31 of the first year)
        #[arg(long)]
        earlier_to: Option<NaiveDate>,
        /// Later window start (defaults to Sep 1 of the last year)
        #[arg(long)]
        later_from: Option<NaiveDate>,
        /// Later window end (defaults to Dec 31 of the last year)
        #[arg(long)]
        later_to: Option<NaiveDate>,
        #[arg(long, default_value = "occurrences")]
        metric: Metric,
        #[arg(long, default_value = "window_delta")]
        subfolder: String,
        #[arg(long)]
        entities: bool,
    },
    /// Cluster yearly frequency shapes with seeded k-means
    Cluster {
        /// Wide table TSV (defaults to the trend job's output)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Number of clusters
        #[arg(long)]
        clusters: Option<usize>,
        /// RNG seed for reproducible assignments
        #[arg(long)]
        seed: Option<u64>,
        /// File with one phrase per line; only those phrases are clustered
        #[arg(long)]
        allowlist: Option<PathBuf>,
        #[arg(long, default_value = "clusters")]
        subfolder: String,
    },
}

fn phrase_collection(entities: bool) -> Collection {
    if entities {
        Collection::NounphrasesWikipedia
    } else {
        Collection::Nounphrases
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting npt-tr v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let client = SolrClient::new(&config.solr_url);

    match cli.command {
        Command::Trend {
            metric,
            subfolder,
            entities,
        } => {
            let wide =
                widetable::build(&client, &config, phrase_collection(entities), metric).await?;
            let dir = config.output_folder.join(&subfolder);
            tsv::write_table(&dir, WIDE_TABLE_FILE, &widetable::to_tsv(&wide))?;

            let tables = report::split_tables(report::compute_trends(&wide));
            report::write_trend_tables(&tables, &wide, &config.output_folder, &subfolder)?;
            info!(
                phrases = wide.rows.len(),
                increasing = tables.increasing_mk.len(),
                decreasing = tables.decreasing_mk.len(),
                "trend job done"
            );
        }
        Command::Delta {
            earlier_from,
            earlier_to,
            later_from,
            later_to,
            metric,
            subfolder,
            entities,
        } => {
            let years = config.trend_years();
            let first = years.first().copied().unwrap_or(2007);
            let last = years.last().copied().unwrap_or(first);
            let earlier = delta::Window {
                from: earlier_from.unwrap_or_else(|| sep_first(first)),
                to: earlier_to.unwrap_or_else(|| dec_last(first)),
            };
            let later = delta::Window {
                from: later_from.unwrap_or_else(|| sep_first(last)),
                to: later_to.unwrap_or_else(|| dec_last(last)),
            };
            let (positive, negative) = delta::run(
                &client,
                phrase_collection(entities),
                metric,
                earlier,
                later,
                &config.output_folder,
                &subfolder,
            )
            .await?;
            info!(positive, negative, "delta job done");
        }
        Command::Cluster {
            input,
            clusters,
            seed,
            allowlist,
            subfolder,
        } => {
            let input = input.unwrap_or_else(|| {
                config
                    .output_folder
                    .join("mannkendall_and_theilsen")
                    .join(WIDE_TABLE_FILE)
            });
            let wide = widetable::from_tsv(&tsv::read_table(&input)?)?;
            let allowed = match allowlist {
                Some(path) => Some(read_allowlist(&path)?),
                None => None,
            };
            let result = cluster::run(
                &wide,
                allowed.as_ref(),
                clusters.unwrap_or(config.cluster.clusters),
                seed.unwrap_or(config.cluster.seed),
                &config.output_folder,
                &subfolder,
            )?;
            info!(clusters = result.centers.len(), "cluster job done");
        }
    }

    Ok(())
}

fn sep_first(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 9, 1).unwrap_or(NaiveDate::MIN)
}

fn dec_last(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN)
}

fn read_allowlist(path: &std::path::Path) -> Result<HashSet<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|line| line.trim().to_ascii_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

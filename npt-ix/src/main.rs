//! npt-ix - index population and corpus counting jobs
//!
//! Subcommands:
//! - `index`: bulk-index the noun-phrase corpus into Solr (4 workers)
//! - `count`: corpus-wide phrase/document counts as TSV tables
//! - `totals`: monthly period-totals JSON from per-month queries
//! - `rollup`: fold the monthly totals file into the yearly one
//! - `window`: one date-range query as a normalized per-phrase TSV

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use npt_common::config::Config;
use npt_common::solr::{Collection, SolrClient};
use npt_ix::{counts, indexer, totals_job, window};

#[derive(Parser)]
#[command(name = "npt-ix", about = "Corpus indexing and counting jobs")]
struct Cli {
    /// Path to the config file (overrides NPTRENDS_CONFIG and defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bulk-index noun-phrase files into the search index
    Index {
        /// Index entity mentions into nounphrases_wikipedia instead
        #[arg(long)]
        entities: bool,
    },
    /// Count phrase and document frequencies over the whole corpus
    Count,
    /// Build the monthly period-totals file by querying each month
    Totals {
        #[arg(long)]
        entities: bool,
    },
    /// Fold the monthly totals file into the yearly totals file
    Rollup,
    /// Run one date-range query and write a normalized per-phrase table
    Window {
        /// From date (yyyy-mm-dd)
        from: NaiveDate,
        /// To date (yyyy-mm-dd)
        to: NaiveDate,
        /// Output file name under Output/QueryResults/
        filename: String,
        #[arg(long)]
        entities: bool,
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
        "Starting npt-ix v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let client = SolrClient::new(&config.solr_url);

    match cli.command {
        Command::Index { entities } => {
            let summary = indexer::index_corpus(
                &client,
                &config.np_files_folder,
                phrase_collection(entities),
            )
            .await?;
            info!(
                files = summary.files_indexed,
                records = summary.records_posted,
                "index job done"
            );
        }
        Command::Count => {
            let corpus_counts = counts::count_corpus(&config.np_files_folder)?;
            counts::write_counts(&corpus_counts, &config.output_folder)?;
            info!(
                phrases = corpus_counts.occurrences.len(),
                "count job done"
            );
        }
        Command::Totals { entities } => {
            let totals = totals_job::build_monthly_totals(
                &client,
                phrase_collection(entities),
                &config.trend_years(),
            )
            .await?;
            totals.save(&config.monthly_totals_file)?;
            info!(
                periods = totals.phrases.len(),
                path = %config.monthly_totals_file.display(),
                "totals job done"
            );
        }
        Command::Rollup => {
            totals_job::rollup_monthly_file(
                &config.monthly_totals_file,
                &config.yearly_totals_file,
            )?;
        }
        Command::Window {
            from,
            to,
            filename,
            entities,
        } => {
            let rows = window::run(
                &client,
                phrase_collection(entities),
                from,
                to,
                &config.output_folder,
                &filename,
            )
            .await?;
            info!(rows, "window job done");
        }
    }

    Ok(())
}

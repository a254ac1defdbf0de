//! npt-viz - frequency dashboard service
//!
//! Serves the noun-phrase trend dashboard and its JSON API. Totals and
//! suggestions are loaded once at startup; every chart request queries
//! the index live.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use npt_common::config::Config;
use npt_viz::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "npt-viz")]
#[command(about = "Noun-phrase frequency dashboard")]
#[command(version)]
struct Args {
    /// Path to the config file (overrides NPTRENDS_CONFIG and defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "NPT_VIZ_PORT")]
    port: Option<u16>,
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
        "Starting npt-viz v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let port = args.port.unwrap_or(config.viz_port);
    let state = Arc::new(AppState::from_config(&config)?);

    npt_viz::api::run(port, state).await
}

//! npt-ps - research paper search service
//!
//! Serves the paper search page and its JSON API over the sentence,
//! metadata, and references collections.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use npt_common::config::Config;
use npt_ps::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "npt-ps")]
#[command(about = "Research paper search service")]
#[command(version)]
struct Args {
    /// Path to the config file (overrides NPTRENDS_CONFIG and defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "NPT_PS_PORT")]
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
        "Starting npt-ps v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let port = args.port.unwrap_or(config.ps_port);
    let state = Arc::new(AppState::from_config(&config));

    npt_ps::api::run(port, state).await
}

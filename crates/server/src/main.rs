//! HTTP server for the movie catalog.
//!
//! Loads the dataset once, then serves the JSON routes until stopped.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{run_server, CatalogService, ConfigArgs};

#[derive(Parser, Debug)]
#[command(name = "reel-server", about = "Serve the movie catalog over HTTP")]
struct CliArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug")),
        )
        .init();

    let args = CliArgs::parse();
    let config = args.config.resolve()?;
    info!("Starting catalog server with {:?}", config);

    let addr = config.socket_addr();
    info!("Loading dataset from {:?}...", config.dataset_dir());
    let service = tokio::task::spawn_blocking(move || CatalogService::load(&config)).await??;

    let summary = service.summary();
    info!(
        "Catalog loaded: {} movies, {} ratings",
        summary.total_movies, summary.total_ratings
    );

    run_server(service, addr).await
}

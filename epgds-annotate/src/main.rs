//! epgds-annotate - subset annotation web tool
//!
//! Loads a subset file and serves the sequential review form on a local
//! port. The `--start-index` flag resumes a previous session.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use epgds_annotate::session::AnnotationSession;
use epgds_annotate::{build_router, AppState};

/// Command-line arguments for epgds-annotate
#[derive(Parser, Debug)]
#[command(name = "epgds-annotate")]
#[command(about = "Web form for annotating an EPG dataset subset")]
#[command(version)]
struct Args {
    /// Subset JSONL file to annotate (must exist)
    #[arg(long, default_value = "epg_dataset_subset.jsonl")]
    subset_path: PathBuf,

    /// Record index to resume from
    #[arg(long, default_value_t = 0)]
    start_index: usize,

    /// Port for the local web UI
    #[arg(long, default_value_t = 7860)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let session = AnnotationSession::load(args.subset_path.clone(), args.start_index)
        .with_context(|| format!("failed to load subset {}", args.subset_path.display()))?;
    info!(
        records = session.total(),
        start_index = args.start_index,
        remaining = session.remaining(),
        "subset loaded"
    );

    let state = AppState::new(session);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("epgds-annotate listening on http://{addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

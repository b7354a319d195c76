//! epgds-extract - EPG dataset extraction tool
//!
//! Walks a date range in one-week chunks (the archive enumeration caps how
//! much one request may return), pulls EPG events from an EDCB server, and
//! appends the resulting programme records to a JSONL dataset file.

use std::cmp::min;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use clap::Parser;
use tracing::{info, warn};

use epgds_common::dataset::{jst, parse_jst_datetime};
use epgds_common::jsonl::JsonlWriter;
use epgds_extract::edcb::{client, CtrlCmdClient};
use epgds_extract::extract::{build_records, DEFAULT_INCLUDE_NETWORK_IDS};

/// Command-line arguments for epgds-extract
#[derive(Parser, Debug)]
#[command(name = "epgds-extract")]
#[command(about = "Extract historical EPG data from an EDCB server into a JSONL dataset")]
#[command(version)]
struct Args {
    /// Destination JSONL dataset path
    #[arg(long, default_value = "epg_dataset.jsonl")]
    dataset_path: PathBuf,

    /// Hostname of the EDCB server to query
    #[arg(long, default_value = "127.0.0.1", env = "EPGDS_EDCB_HOST")]
    edcb_host: String,

    /// CtrlCmd port of the EDCB server
    #[arg(long, default_value_t = client::DEFAULT_PORT, env = "EPGDS_EDCB_PORT")]
    edcb_port: u16,

    /// Connect timeout in seconds; archive enumeration on a loaded server
    /// can be slow, so the default is generous
    #[arg(long, default_value_t = 60)]
    edcb_timeout_secs: u64,

    /// Start of the extraction range (JST). Defaults to 24 hours ago.
    #[arg(long, value_parser = parse_jst_datetime)]
    start_date: Option<DateTime<FixedOffset>>,

    /// End of the extraction range (JST). Defaults to now.
    #[arg(long, value_parser = parse_jst_datetime)]
    end_date: Option<DateTime<FixedOffset>>,

    /// Network id to extract; repeat for multiple. Defaults to BS, CS1, CS2
    /// and the Tokyo-area terrestrial networks.
    #[arg(long = "include-network-id")]
    include_network_ids: Vec<u16>,
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

    // The full dataset is append-only output of one extraction run;
    // an existing file is never clobbered
    if args.dataset_path.exists() {
        bail!(
            "dataset file {} already exists; move it aside to re-extract",
            args.dataset_path.display()
        );
    }

    let now = Utc::now().with_timezone(&jst());
    let start_date = args.start_date.unwrap_or(now - Duration::days(1));
    let end_date = args.end_date.unwrap_or(now);
    info!(%start_date, %end_date, "extraction range (JST)");

    let include_network_ids = if args.include_network_ids.is_empty() {
        DEFAULT_INCLUDE_NETWORK_IDS.to_vec()
    } else {
        args.include_network_ids.clone()
    };

    let client = CtrlCmdClient::new(&args.edcb_host, args.edcb_port)
        .with_connect_timeout(std::time::Duration::from_secs(args.edcb_timeout_secs));
    let mut writer = JsonlWriter::create_new(&args.dataset_path)
        .with_context(|| format!("failed to create {}", args.dataset_path.display()))?;

    let started = Instant::now();
    let mut seen_ids = HashSet::new();
    let mut total = 0usize;

    // One-week chunks, oldest first, so the dataset stays roughly
    // chronological even across a long range
    let mut current = start_date;
    while current < end_date {
        let chunk_end = min(current + Duration::weeks(1), end_date);
        info!(from = %current, to = %chunk_end, "fetching archived EPG data");

        let mut services = match client.enum_pg_arc(&current, &chunk_end).await {
            Ok(services) => services,
            Err(e) => {
                warn!(error = %e, "archived EPG enumeration failed for this chunk");
                Vec::new()
            }
        };

        // The archive only covers the past; a chunk reaching beyond now also
        // needs the schedule enumeration
        if chunk_end > now {
            info!("chunk end is in the future; fetching scheduled EPG data too");
            match client.enum_pg_info_ex(&current, &chunk_end).await {
                Ok(more) => services.extend(more),
                Err(e) => warn!(error = %e, "scheduled EPG enumeration failed for this chunk"),
            }
        }

        let mut records = build_records(&services, &include_network_ids, &mut seen_ids)?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        for record in &records {
            info!(id = %record.id, "add");
            writer.write(record)?;
        }
        total += records.len();

        current = chunk_end;
    }

    writer.flush()?;
    info!(
        records = total,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "extraction complete"
    );
    Ok(())
}

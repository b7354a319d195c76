//! epgds-subset - stratified EPG dataset subset generator
//!
//! Reads the full JSONL dataset, drops invalid/unwanted/duplicate records,
//! draws a weighted sample per broadcast category (terrestrial 65%, free BS
//! 25%, paid BS + CS 10%), and writes the id-sorted, annotation-ready
//! subset file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use epgds_common::dataset::{parse_jst_datetime, SubsetRecord};
use epgds_common::jsonl::{read_jsonl, write_jsonl};
use epgds_subset::filter::{filter_candidates, FilterOptions};
use epgds_subset::sampler::sample_subset;
use epgds_subset::stats::log_distribution;

/// Command-line arguments for epgds-subset
#[derive(Parser, Debug)]
#[command(name = "epgds-subset")]
#[command(about = "Generate a stratified, annotation-ready subset of an EPG dataset")]
#[command(version)]
struct Args {
    /// Source JSONL dataset path
    #[arg(long, default_value = "epg_dataset.jsonl")]
    dataset_path: PathBuf,

    /// Destination subset path (overwritten when it exists)
    #[arg(long, default_value = "epg_dataset_subset.jsonl")]
    subset_path: PathBuf,

    /// Number of records to select
    #[arg(long, default_value_t = 5000)]
    subset_size: usize,

    /// Only consider programmes starting at or after this JST datetime
    #[arg(long, value_parser = parse_jst_datetime)]
    start_date: Option<DateTime<FixedOffset>>,

    /// Only consider programmes starting at or before this JST datetime
    #[arg(long, value_parser = parse_jst_datetime)]
    end_date: Option<DateTime<FixedOffset>>,

    /// RNG seed; runs with the same seed and input are byte-identical.
    /// Unseeded runs draw from OS entropy.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let records: Vec<SubsetRecord> = read_jsonl(&args.dataset_path)
        .with_context(|| format!("failed to read {}", args.dataset_path.display()))?;
    info!(records = records.len(), "dataset loaded");

    let options = FilterOptions {
        start_date: args.start_date,
        end_date: args.end_date,
    };
    let candidates = filter_candidates(records, &options);

    let mut rng = match args.seed {
        Some(seed) => {
            info!(seed, "using fixed RNG seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // Fails (and leaves no output file behind) when nothing survived filtering
    let subset = sample_subset(candidates, args.subset_size, &mut rng)?;

    log_distribution(&subset);

    write_jsonl(&args.subset_path, &subset)
        .with_context(|| format!("failed to write {}", args.subset_path.display()))?;
    info!(
        records = subset.len(),
        path = %args.subset_path.display(),
        "subset written"
    );
    Ok(())
}

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(
    clippy::nursery,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glob::GlobError;
use rayon::prelude::*;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use trackman_rs::aggregate_file;
use trackman_rs::sync::{
    sync_folder, LocalBucket, LocalFolder, SyncSummary, DEFAULT_BUCKET, DEFAULT_KEY_PREFIX,
};
use trackman_rs::trackman::output::{write_run, OutputFiles};
use trackman_rs::trackman::profile::GameSummary;
use trackman_rs::trackman::stats::format_velocity;

const ABOUT: &str = "Aggregates TrackMan pitch exports and syncs raw exports to a bucket.";

#[derive(Parser, Debug)]
#[command(name = "trackman", about = ABOUT)]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse TrackMan CSV exports into pitch, player and summary files
    Aggregate {
        /// File path or glob pattern, e.g. `data/*.csv`
        #[arg(short, long, env = "TRACKMAN_INPUT")]
        input: String,

        #[arg(short, long, env = "TRACKMAN_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Entries kept per leaderboard
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Copy every file in a folder into a bucket
    Sync {
        #[arg(short, long, env = "TRACKMAN_SYNC_FOLDER")]
        folder: PathBuf,

        #[arg(long, env = "TRACKMAN_BUCKET_ROOT")]
        bucket_root: PathBuf,

        #[arg(long, env = "TRACKMAN_BUCKET", default_value = DEFAULT_BUCKET)]
        bucket: String,

        #[arg(long, env = "TRACKMAN_KEY_PREFIX", default_value = DEFAULT_KEY_PREFIX)]
        prefix: String,
    },
}

fn input_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = glob::glob(pattern)
        .with_context(|| format!("Invalid input pattern {pattern}"))?
        .collect::<Result<Vec<PathBuf>, GlobError>>()?;
    files.par_sort();
    if files.is_empty() {
        bail!("No input files match {}", pattern);
    }
    Ok(files)
}

fn process_file(path: &Path, output_dir: &Path, top: usize) -> Result<(OutputFiles, GameSummary)> {
    debug!("Processing file {}", path.display());
    let aggregation = aggregate_file(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .context("Input file has no name")?;
    let files = write_run(output_dir, &stem, &aggregation, top)
        .with_context(|| format!("Failed to write output for {}", path.display()))?;
    Ok((files, GameSummary::from(&aggregation)))
}

fn run_aggregate(input: &str, output_dir: &Path, top: usize) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;
    let files = input_files(input)?;
    info!("Aggregating {} TrackMan files", files.len());

    let failures = files
        .par_iter()
        .map(|f| (f, process_file(f, output_dir, top)))
        .filter_map(|(f, result)| match result {
            Ok((written, summary)) => {
                info!(
                    "{}: {} pitches, {} players, avg {} mph, max {} mph -> {}",
                    f.display(),
                    summary.total_pitches,
                    summary.total_players,
                    format_velocity(summary.avg_velocity),
                    format_velocity(summary.max_velocity),
                    written.summary.display()
                );
                None
            }
            Err(e) => {
                error!("{:?}", e);
                Some(f)
            }
        })
        .count();

    if failures > 0 {
        bail!("{} of {} files failed", failures, files.len());
    }
    Ok(())
}

fn run_sync(folder: &Path, bucket_root: &Path, bucket: &str, prefix: &str) -> Result<()> {
    let folder = LocalFolder::new(folder);
    let store = LocalBucket::new(bucket_root, bucket);
    let result = sync_folder(&folder, &store, prefix);
    let summary = SyncSummary::from(&result);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    result.map(|_| ())
}

#[allow(clippy::expect_used)]
fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to initialize trace");

    let start = Instant::now();
    let opt: Opt = Opt::parse();

    let result = match opt.command {
        Command::Aggregate {
            input,
            output_dir,
            top,
        } => run_aggregate(&input, &output_dir, top),
        Command::Sync {
            folder,
            bucket_root,
            bucket,
            prefix,
        } => run_sync(&folder, &bucket_root, &bucket, &prefix),
    };

    info!("Elapsed: {:?}", start.elapsed());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

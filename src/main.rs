//! Gcmt-Sync main entry point
//!
//! Command-line interface for bootstrapping and incrementally updating a
//! local GCMT moment-tensor catalog.

use anyhow::Context;
use clap::Parser;
use gcmt_sync::catalog::{create_data_file, DataFormat};
use gcmt_sync::config::load_config_with_hash;
use gcmt_sync::remote::{build_http_client, fetch_historical, fetch_slab_archive};
use gcmt_sync::sync::run_sync;
use gcmt_sync::{Config, SyncOutcome};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Gcmt-Sync: incremental moment-tensor catalog synchronizer
///
/// Bootstraps a local catalog from the historical GCMT archive and keeps it
/// current by merging the monthly data files the remote publisher posts.
#[derive(Parser, Debug)]
#[command(name = "gcmt-sync")]
#[command(version = "1.0.0")]
#[command(about = "Incremental GCMT moment-tensor catalog synchronizer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Download and convert the full historical catalog (implies --update)
    #[arg(short, long)]
    gcmt: bool,

    /// Merge monthly data published since the catalog's newest event
    #[arg(short, long)]
    update: bool,

    /// Skip downloading slab reference data during bootstrap
    #[arg(short = 'n', long = "no-slab")]
    no_slab: bool,

    /// Delete the existing data folder before doing anything else
    #[arg(short, long)]
    reinit: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let update = cli.update || cli.gcmt;
    if !update && !cli.reinit {
        anyhow::bail!("nothing to do: pass --gcmt to bootstrap, --update to synchronize, or --reinit to reset");
    }

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("loading configuration")?;

    if cli.reinit {
        handle_reinit(&config)?;
    }

    std::fs::create_dir_all(&config.data.folder).with_context(|| {
        format!("creating data folder {}", config.data.folder)
    })?;

    if cli.gcmt {
        handle_bootstrap(&config, cli.no_slab).await?;
    }

    if update {
        handle_update(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gcmt_sync=info,warn"),
            1 => EnvFilter::new("gcmt_sync=debug,info"),
            2 => EnvFilter::new("gcmt_sync=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --reinit: removes the data folder so the next bootstrap starts
/// clean
fn handle_reinit(config: &Config) -> anyhow::Result<()> {
    let folder = Path::new(&config.data.folder);
    if folder.exists() {
        tracing::info!("Deleting existing data folder {}", folder.display());
        std::fs::remove_dir_all(folder)
            .with_context(|| format!("deleting data folder {}", folder.display()))?;
    }
    Ok(())
}

/// Handles --gcmt: fetches the bootstrap resources and initializes the
/// catalog. Any failure here is fatal; there is nothing to resume from.
async fn handle_bootstrap(config: &Config, no_slab: bool) -> anyhow::Result<()> {
    let client = build_http_client()?;

    if !no_slab {
        tracing::info!("Downloading slab reference data (this may take a while)...");
        let slab_url = Url::parse(&config.remote.slab_url)?;
        fetch_slab_archive(&client, &slab_url, Path::new(&config.data.folder))
            .await
            .context("downloading slab reference data")?;
        tracing::info!("Finished downloading slab reference data");
    }

    tracing::info!("Downloading and converting historical data...");
    let historical_url = Url::parse(&config.remote.historical_url)?;
    let staged = fetch_historical(&client, &historical_url)
        .await
        .context("downloading historical catalog")?;

    let rows = create_data_file(
        staged.path(),
        &config.catalog_path(),
        DataFormat::Ndk,
        "gcmt",
        false,
    )
    .context("converting historical catalog")?;
    tracing::info!("Initialized catalog with {} historical events", rows);

    Ok(())
}

/// Handles --update: runs the incremental synchronization pass
async fn handle_update(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let report = run_sync(config, config_hash).await?;

    match report.outcome {
        SyncOutcome::Completed => tracing::info!(
            "Synchronization complete: {} months merged, {} skipped",
            report.months_merged,
            report.months_skipped
        ),
        SyncOutcome::Aborted { year } => tracing::warn!(
            "Synchronization stopped at {}: {} months merged, {} skipped; re-run later to continue",
            year,
            report.months_merged,
            report.months_skipped
        ),
    }

    if let Some(origin) = &report.final_origin {
        println!("Catalog contains events through {}.", origin);
    }

    Ok(())
}

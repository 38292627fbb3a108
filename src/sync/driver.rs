//! Synchronization driver
//!
//! The driver walks `start_year..=current_year` ascending. Each year's
//! month list is resolved from the remote listing before any month of that
//! year is attempted; each resolved month is fetched and merged one at a
//! time. Failure policy, in increasing severity:
//!
//! - A month that fails to fetch or merge is logged and skipped; the
//!   publisher usually has not posted it yet.
//! - A year whose listing cannot be resolved aborts the remainder of the
//!   run. Merges already committed stay committed; the next invocation
//!   resumes from the recomputed cursor.
//! - A cursor that cannot be derived from the catalog is fatal.

use crate::catalog::{append_data_file, CatalogStore, DataFormat, RunStatus};
use crate::config::Config;
use crate::cursor::SyncCursor;
use crate::remote::{build_http_client, fetch_monthly, monthly_url, resolve_months, MonthlyUnit};
use crate::{Result, SyncError};
use chrono::{Datelike, Utc};
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

/// How a synchronization run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every year through the current one was visited.
    Completed,
    /// The listing for `year` could not be resolved; later years were not
    /// attempted.
    Aborted { year: i32 },
}

/// Final state of a synchronization run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub months_merged: u32,
    pub months_skipped: u32,
    /// `max(origin)` recomputed from the catalog after the run.
    pub final_origin: Option<String>,
}

/// Orchestrates one synchronization pass
pub struct SyncDriver {
    catalog_path: PathBuf,
    monthly_base: Url,
    config_hash: String,
    client: Client,
}

impl SyncDriver {
    /// Creates a driver from an explicit configuration value.
    pub fn new(config: Config, config_hash: &str) -> Result<Self> {
        let monthly_base = Url::parse(&config.remote.monthly_base_url)?;
        let client = build_http_client()?;

        Ok(Self {
            catalog_path: config.catalog_path(),
            monthly_base,
            config_hash: config_hash.to_string(),
            client,
        })
    }

    /// Runs synchronization from the catalog cursor through the current
    /// calendar year.
    pub async fn run(&self) -> Result<SyncReport> {
        self.run_through(Utc::now().year()).await
    }

    /// Runs synchronization from the catalog cursor through `last_year`
    /// inclusive.
    pub async fn run_through(&self, last_year: i32) -> Result<SyncReport> {
        let mut store = CatalogStore::open(&self.catalog_path)?;
        let max_origin = store.max_origin()?.ok_or(SyncError::EmptyCatalog)?;
        let start = SyncCursor::after_timestamp(&max_origin)?;
        tracing::info!(
            "Catalog contains events through {}; syncing from {} through {}",
            max_origin,
            start,
            last_year
        );

        let run_id = store.begin_run(&self.config_hash)?;
        let (outcome, months_merged, months_skipped) = self.sync_years(start, last_year).await?;

        let status = match outcome {
            SyncOutcome::Completed => RunStatus::Completed,
            SyncOutcome::Aborted { .. } => RunStatus::Aborted,
        };
        store.finish_run(run_id, status)?;

        // Recomputed from durable state, never trusted from memory.
        let final_origin = store.max_origin()?;

        Ok(SyncReport {
            outcome,
            months_merged,
            months_skipped,
            final_origin,
        })
    }

    async fn sync_years(&self, start: SyncCursor, last_year: i32) -> Result<(SyncOutcome, u32, u32)> {
        let mut months_merged = 0;
        let mut months_skipped = 0;

        for year in start.year..=last_year {
            // Only the first year is constrained by the cursor month.
            let start_month = if year == start.year { start.month } else { 1 };

            let months = match resolve_months(&self.client, &self.monthly_base, year, start_month)
                .await
            {
                Ok(months) => months,
                Err(e) => {
                    tracing::error!("{}; stopping (committed months are kept)", e);
                    return Ok((SyncOutcome::Aborted { year }, months_merged, months_skipped));
                }
            };

            if months.is_empty() {
                tracing::info!("No new monthly files listed for {}", year);
                continue;
            }

            for month in months {
                let unit = MonthlyUnit { year, month };
                match self.fetch_and_merge(unit).await {
                    Ok(rows) => {
                        months_merged += 1;
                        tracing::info!("Merged {} events from {}", rows, unit);
                    }
                    Err(e) => {
                        months_skipped += 1;
                        tracing::warn!("Could not merge {}: {} (it may not be posted yet)", unit, e);
                    }
                }
            }
        }

        Ok((SyncOutcome::Completed, months_merged, months_skipped))
    }

    async fn fetch_and_merge(&self, unit: MonthlyUnit) -> Result<usize> {
        let url = monthly_url(&self.monthly_base, unit)?;
        tracing::debug!("Fetching {}", url);

        let staged = fetch_monthly(&self.client, &self.monthly_base, unit).await?;
        let rows = append_data_file(
            staged.path(),
            &self.catalog_path,
            DataFormat::Ndk,
            "gcmt",
            false,
        )?;
        Ok(rows)
    }
}

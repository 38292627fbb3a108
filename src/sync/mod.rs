//! Incremental synchronization
//!
//! This module contains the orchestrating state machine that walks years
//! and months from the catalog's high-water mark to the current calendar
//! year, fetching and merging each published monthly file in strictly
//! ascending order.

mod driver;

pub use driver::{SyncDriver, SyncOutcome, SyncReport};

use crate::config::Config;
use crate::Result;

/// Runs a complete synchronization pass with the given configuration.
pub async fn run_sync(config: Config, config_hash: &str) -> Result<SyncReport> {
    let driver = SyncDriver::new(config, config_hash)?;
    driver.run().await
}

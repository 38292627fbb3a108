//! Remote archive access
//!
//! This module covers everything that touches the remote publisher:
//! - Scanning per-year directory listings for available monthly data files
//! - Fetching one monthly file into a local staging location
//! - The two one-shot bootstrap downloads (historical catalog, slab data)

mod fetcher;
mod index;

pub use fetcher::{
    build_http_client, fetch_historical, fetch_monthly, fetch_slab_archive, listing_url,
    monthly_url,
};
pub use index::{available_months, month_number, resolve_months, scan_listing};

use std::fmt;

/// Lowercase three-letter month abbreviations in the remote naming
/// convention, indexed by month number minus one.
pub const MONTH_ABBREV: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Identifies exactly one remote monthly data file by (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyUnit {
    pub year: i32,
    pub month: u32,
}

impl MonthlyUnit {
    /// Remote file name for this unit, e.g. `jan11.ndk` for January 2011.
    pub fn file_name(&self) -> String {
        format!(
            "{}{:02}.ndk",
            MONTH_ABBREV[(self.month - 1) as usize],
            self.year % 100
        )
    }
}

impl fmt::Display for MonthlyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTH_ABBREV[(self.month - 1) as usize], self.year)
    }
}

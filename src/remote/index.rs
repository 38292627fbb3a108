//! Per-year listing scan
//!
//! The remote publisher exposes one free-text directory listing per year.
//! Monthly data files are discovered by regex-mining that text for the fixed
//! `<mon><yy>.ndk` naming convention. The scan itself is a pure function
//! over the listing text, so the pattern can be swapped or the endpoint
//! replaced with a structured index without touching the sync driver.

use crate::remote::MONTH_ABBREV;
use crate::{Result, SyncError};
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

fn token_pattern() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"[a-z]{3}[0-9]{2}\.ndk").expect("monthly file pattern is valid")
    })
}

/// Extracts monthly file tokens from raw listing text.
///
/// Duplicates are dropped keeping the first occurrence in its original
/// position; listings typically mention each file several times (link
/// target, link text) and the first-seen order aids debugging.
pub fn scan_listing(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    token_pattern()
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Maps a token's three-letter month abbreviation to a 1-12 month number.
///
/// Returns `None` for abbreviations outside the fixed jan..dec table.
pub fn month_number(token: &str) -> Option<u32> {
    let abbrev = token.get(..3)?;
    MONTH_ABBREV
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

/// Month numbers with a data file present in the listing text, at or after
/// `start_month`, ascending and duplicate-free.
///
/// An empty result is valid: the publisher simply has nothing new yet.
pub fn available_months(raw: &str, start_month: u32) -> Vec<u32> {
    let mut months: Vec<u32> = scan_listing(raw)
        .iter()
        .filter_map(|token| month_number(token))
        .filter(|&m| m >= start_month)
        .collect();
    months.sort_unstable();
    months.dedup();
    months
}

/// Fetches the listing for `year` and returns its available months at or
/// after `start_month`.
///
/// Any transport or HTTP-status failure is an
/// [`SyncError::IndexUnavailable`], which aborts the remainder of the run.
pub async fn resolve_months(
    client: &Client,
    monthly_base: &Url,
    year: i32,
    start_month: u32,
) -> Result<Vec<u32>> {
    let url = crate::remote::listing_url(monthly_base, year)?;

    let unavailable = |message: String| SyncError::IndexUnavailable {
        year,
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(unavailable(format!("HTTP {}", response.status())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    Ok(available_months(&body, start_month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_dedups_preserving_first_seen_order() {
        let raw = "jan76.ndk feb76.ndk jan76.ndk";
        assert_eq!(scan_listing(raw), vec!["jan76.ndk", "feb76.ndk"]);
    }

    #[test]
    fn test_scan_finds_tokens_inside_markup() {
        let raw = r#"<html><body>
            <a href="jan11.ndk">jan11.ndk</a> 2011-02-01 14:00 312K
            <a href="feb11.ndk">feb11.ndk</a> 2011-03-01 14:00 298K
            <a href="qc_notes.txt">qc_notes.txt</a>
        </body></html>"#;
        assert_eq!(scan_listing(raw), vec!["jan11.ndk", "feb11.ndk"]);
    }

    #[test]
    fn test_scan_empty_listing() {
        assert!(scan_listing("<html><body>Index of /2031</body></html>").is_empty());
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("jan11.ndk"), Some(1));
        assert_eq!(month_number("dec06.ndk"), Some(12));
        assert_eq!(month_number("xyz11.ndk"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn test_available_months_filters_and_sorts() {
        // Months {3, 1, 5, 2} out of order; starting at 2 keeps [2, 3, 5].
        let raw = "mar11.ndk jan11.ndk may11.ndk feb11.ndk";
        assert_eq!(available_months(raw, 2), vec![2, 3, 5]);
    }

    #[test]
    fn test_available_months_start_month_one_keeps_all() {
        let raw = "mar11.ndk jan11.ndk may11.ndk feb11.ndk";
        assert_eq!(available_months(raw, 1), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_available_months_empty_is_valid() {
        assert!(available_months("nothing published yet", 1).is_empty());
    }

    #[test]
    fn test_available_months_ignores_unknown_abbreviations() {
        let raw = "abc11.ndk jun11.ndk";
        assert_eq!(available_months(raw, 1), vec![6]);
    }
}

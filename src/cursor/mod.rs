//! Synchronization cursor derived from the catalog's high-water mark
//!
//! The catalog's most recent `origin` timestamp determines which monthly
//! data files still need to be fetched. This module turns that stored
//! timestamp into a (year, month) cursor pointing at the first month the
//! remote archive may have that the catalog does not.

use crate::{Result, SyncError};
use chrono::{Datelike, NaiveDateTime};
use std::fmt;

/// Fixed textual format of `origin` timestamps in the catalog.
pub const ORIGIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A (year, month) position in the monthly publication sequence.
///
/// Invariant: `month` is in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncCursor {
    pub year: i32,
    pub month: u32,
}

impl SyncCursor {
    /// Returns the calendar point immediately after the given origin
    /// timestamp.
    ///
    /// Only the first 19 characters are parsed, truncating any sub-second
    /// or timezone suffix the store may carry. A stored maximum of
    /// `2010-12-15 00:00:00` yields the cursor (2011, 1).
    ///
    /// Fails with [`SyncError::MalformedTimestamp`] if the value cannot be
    /// parsed; the cursor is foundational, so callers treat this as fatal.
    pub fn after_timestamp(raw: &str) -> Result<Self> {
        let head = raw
            .get(..19)
            .ok_or_else(|| SyncError::MalformedTimestamp(raw.to_string()))?;
        let parsed = NaiveDateTime::parse_from_str(head, ORIGIN_FORMAT)
            .map_err(|_| SyncError::MalformedTimestamp(raw.to_string()))?;

        let mut cursor = SyncCursor {
            year: parsed.year(),
            month: parsed.month(),
        };
        cursor.advance();
        Ok(cursor)
    }

    /// Advances the cursor by exactly one calendar month, rolling month 13
    /// over into January of the next year.
    pub fn advance(&mut self) {
        self.month += 1;
        if self.month == 13 {
            self.year += 1;
            self.month = 1;
        }
    }
}

impl fmt::Display for SyncCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_after_mid_year_timestamp() {
        let cursor = SyncCursor::after_timestamp("2014-03-22 17:11:04").unwrap();
        assert_eq!(
            cursor,
            SyncCursor {
                year: 2014,
                month: 4
            }
        );
    }

    #[test]
    fn test_cursor_december_rolls_into_next_year() {
        let cursor = SyncCursor::after_timestamp("2010-12-15 00:00:00").unwrap();
        assert_eq!(
            cursor,
            SyncCursor {
                year: 2011,
                month: 1
            }
        );
    }

    #[test]
    fn test_subsecond_suffix_is_truncated() {
        let cursor = SyncCursor::after_timestamp("2010-12-15 00:00:00.482+00:00").unwrap();
        assert_eq!(
            cursor,
            SyncCursor {
                year: 2011,
                month: 1
            }
        );
    }

    #[test]
    fn test_short_value_is_malformed() {
        let result = SyncCursor::after_timestamp("2010-12-15");
        assert!(matches!(result, Err(SyncError::MalformedTimestamp(_))));
    }

    #[test]
    fn test_garbage_value_is_malformed() {
        let result = SyncCursor::after_timestamp("not a timestamp at all!");
        assert!(matches!(result, Err(SyncError::MalformedTimestamp(_))));
    }

    #[test]
    fn test_advance_within_year() {
        let mut cursor = SyncCursor {
            year: 2020,
            month: 5,
        };
        cursor.advance();
        assert_eq!(
            cursor,
            SyncCursor {
                year: 2020,
                month: 6
            }
        );
    }

    #[test]
    fn test_advance_rollover() {
        let mut cursor = SyncCursor {
            year: 2020,
            month: 12,
        };
        cursor.advance();
        assert_eq!(
            cursor,
            SyncCursor {
                year: 2021,
                month: 1
            }
        );
    }

    #[test]
    fn test_display() {
        let cursor = SyncCursor {
            year: 2011,
            month: 3,
        };
        assert_eq!(cursor.to_string(), "2011-03");
    }
}

//! NDK reader and catalog merge operations
//!
//! The archive publishes moment tensors in the NDK text format: five
//! 80-column lines per event. Line 1 carries the reference catalog, origin
//! date/time, hypocenter and body/surface-wave magnitudes; line 2 starts
//! with the event code; lines 3-5 carry the centroid and tensor solution,
//! which the catalog does not need for synchronization.
//!
//! Both merge entry points parse the complete staged file before touching
//! the database and write all rows inside one transaction, so a malformed
//! file leaves the catalog untouched.

use crate::catalog::sqlite::require_existing;
use crate::catalog::{CatalogStore, EventRow, StoreError, StoreResult};
use crate::cursor::ORIGIN_FORMAT;
use chrono::NaiveDateTime;
use std::path::Path;

const LINES_PER_EVENT: usize = 5;

/// Source data format identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Ndk,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ndk => "ndk",
        }
    }
}

/// One event parsed out of an NDK block
#[derive(Debug, Clone, PartialEq)]
pub struct NdkEvent {
    pub event_code: String,
    pub origin: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub mb: f64,
    pub ms: f64,
}

impl NdkEvent {
    fn into_row(self, format: DataFormat, vendor: &str) -> EventRow {
        EventRow {
            event_code: self.event_code,
            origin: self.origin,
            latitude: self.latitude,
            longitude: self.longitude,
            depth_km: self.depth_km,
            mb: self.mb,
            ms: self.ms,
            source_format: format.as_str().to_string(),
            source_vendor: vendor.to_string(),
        }
    }
}

/// Parses NDK text into events.
///
/// `has_header` skips one leading header line. An empty file yields no
/// events; a block with fewer than five lines or an unparsable hypocenter
/// line is an error.
pub fn parse_ndk(text: &str, has_header: bool) -> StoreResult<Vec<NdkEvent>> {
    let lines: Vec<&str> = text.lines().collect();
    let start = if has_header { 1 } else { 0 };
    let body = lines.get(start..).unwrap_or(&[]);

    let mut events = Vec::new();
    for (i, block) in body.chunks(LINES_PER_EVENT).enumerate() {
        let line_no = start + i * LINES_PER_EVENT + 1;
        if block.len() < LINES_PER_EVENT {
            return Err(StoreError::NdkParse {
                line: line_no,
                message: format!(
                    "truncated event block: {} of {} lines",
                    block.len(),
                    LINES_PER_EVENT
                ),
            });
        }
        events.push(parse_block(block, line_no)?);
    }
    Ok(events)
}

fn parse_block(block: &[&str], line_no: usize) -> StoreResult<NdkEvent> {
    let malformed = |message: String| StoreError::NdkParse {
        line: line_no,
        message,
    };

    // Hypocenter line, e.g.:
    // PDE  2005/01/01 01:20:05.4  13.78  -88.78 193.1 5.0 0.0 EL SALVADOR
    let fields: Vec<&str> = block[0].split_whitespace().collect();
    if fields.len() < 8 {
        return Err(malformed(format!(
            "hypocenter line has {} fields, expected at least 8",
            fields.len()
        )));
    }

    let date = fields[1].replace('/', "-");
    let time = fields[2]
        .get(..8)
        .ok_or_else(|| malformed(format!("origin time '{}' is too short", fields[2])))?;
    let origin = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&origin, ORIGIN_FORMAT)
        .map_err(|_| malformed(format!("invalid origin time '{}'", origin)))?;

    let number = |index: usize, name: &str| -> StoreResult<f64> {
        fields[index]
            .parse()
            .map_err(|_| malformed(format!("invalid {} '{}'", name, fields[index])))
    };
    let latitude = number(3, "latitude")?;
    let longitude = number(4, "longitude")?;
    let depth_km = number(5, "depth")?;
    let mb = number(6, "mb")?;
    let ms = number(7, "ms")?;

    let event_code = block[1]
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing event code".to_string()))?
        .to_string();

    Ok(NdkEvent {
        event_code,
        origin,
        latitude,
        longitude,
        depth_km,
        mb,
        ms,
    })
}

fn merge(
    staged: &Path,
    catalog: &Path,
    format: DataFormat,
    vendor: &str,
    has_header: bool,
) -> StoreResult<usize> {
    let text = std::fs::read_to_string(staged)?;
    let events = parse_ndk(&text, has_header)?;

    let rows: Vec<EventRow> = events
        .into_iter()
        .map(|event| event.into_row(format, vendor))
        .collect();

    let mut store = CatalogStore::open(catalog)?;
    store.append_events(&rows)
}

/// Initializes a new catalog from a staged bulk file and merges its rows.
pub fn create_data_file(
    staged: &Path,
    catalog: &Path,
    format: DataFormat,
    vendor: &str,
    has_header: bool,
) -> StoreResult<usize> {
    merge(staged, catalog, format, vendor, has_header)
}

/// Merges one staged monthly file into an existing catalog.
pub fn append_data_file(
    staged: &Path,
    catalog: &Path,
    format: DataFormat,
    vendor: &str,
    has_header: bool,
) -> StoreResult<usize> {
    require_existing(catalog)?;
    merge(staged, catalog, format, vendor, has_header)
}

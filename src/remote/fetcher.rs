//! HTTP fetcher for monthly and bootstrap resources
//!
//! All downloads land in staging tempfiles (or, for the slab archive, are
//! unpacked straight into the data folder). The staged file is handed to the
//! merge layer and removed when the handle drops, so a failed merge never
//! leaves partial data behind.

use crate::remote::MonthlyUnit;
use crate::{Result, SyncError};
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;

/// Builds the HTTP client used for every remote operation.
///
/// Timeouts are explicit: a year listing or monthly file that takes longer
/// than 30 seconds is treated as unavailable rather than waited on forever.
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()
}

/// URL of the per-year directory listing, e.g. `<base>/2011/`.
pub fn listing_url(monthly_base: &Url, year: i32) -> Result<Url> {
    Ok(monthly_base.join(&format!("{}/", year))?)
}

/// URL of one monthly data file, e.g. `<base>/2011/jan11.ndk`.
pub fn monthly_url(monthly_base: &Url, unit: MonthlyUnit) -> Result<Url> {
    Ok(monthly_base.join(&format!("{}/{}", unit.year, unit.file_name()))?)
}

async fn get_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let failed = |message: String| SyncError::FetchFailed {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let body = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    Ok(body.to_vec())
}

/// Downloads one monthly data file into a staging tempfile.
///
/// Failure here is the expected case for months the publisher has not
/// posted yet; the caller logs it and moves on.
pub async fn fetch_monthly(
    client: &Client,
    monthly_base: &Url,
    unit: MonthlyUnit,
) -> Result<NamedTempFile> {
    let url = monthly_url(monthly_base, unit)?;
    let body = get_bytes(client, &url).await?;

    let mut staged = NamedTempFile::new()?;
    staged.write_all(&body)?;
    staged.flush()?;
    Ok(staged)
}

/// Downloads the gzip-compressed historical catalog and stages the
/// decompressed text.
///
/// A truncated or corrupt gzip stream is an error, not a silently shorter
/// catalog.
pub async fn fetch_historical(client: &Client, url: &Url) -> Result<NamedTempFile> {
    let body = get_bytes(client, url).await?;

    let mut decoder = GzDecoder::new(body.as_slice());
    let mut text = Vec::new();
    decoder
        .read_to_end(&mut text)
        .map_err(|e| SyncError::CorruptArchive {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let mut staged = NamedTempFile::new()?;
    staged.write_all(&text)?;
    staged.flush()?;
    Ok(staged)
}

/// Downloads the tar+gzip slab reference archive and unpacks it into the
/// data folder.
pub async fn fetch_slab_archive(client: &Client, url: &Url, data_folder: &Path) -> Result<()> {
    let body = get_bytes(client, url).await?;

    let decoder = GzDecoder::new(body.as_slice());
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(data_folder)
        .map_err(|e| SyncError::CorruptArchive {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    Ok(())
}

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure for Gcmt-Sync
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// Absolute location of the catalog database inside the data folder.
    pub fn catalog_path(&self) -> PathBuf {
        Path::new(&self.data.folder).join(&self.data.catalog_file)
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Folder holding the catalog database and slab reference data
    pub folder: String,

    /// File name of the catalog database inside the data folder
    #[serde(rename = "catalog-file", default = "default_catalog_file")]
    pub catalog_file: String,
}

/// Remote archive endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Base URL under which per-year listings and monthly files live;
    /// must end with a slash
    #[serde(rename = "monthly-base-url", default = "default_monthly_base_url")]
    pub monthly_base_url: String,

    /// Gzip-compressed historical catalog (bootstrap)
    #[serde(rename = "historical-url", default = "default_historical_url")]
    pub historical_url: String,

    /// Tar+gzip slab reference archive (bootstrap)
    #[serde(rename = "slab-url", default = "default_slab_url")]
    pub slab_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            monthly_base_url: default_monthly_base_url(),
            historical_url: default_historical_url(),
            slab_url: default_slab_url(),
        }
    }
}

fn default_catalog_file() -> String {
    "gcmt.db".to_string()
}

fn default_monthly_base_url() -> String {
    "https://www.ldeo.columbia.edu/~gcmt/projects/CMT/catalog/NEW_MONTHLY/".to_string()
}

fn default_historical_url() -> String {
    "https://www.ldeo.columbia.edu/~gcmt/projects/CMT/catalog/jan76_dec10.ndk.gz".to_string()
}

fn default_slab_url() -> String {
    "https://hazards.cr.usgs.gov/web/data/slab/models/allslabs.tgz".to_string()
}

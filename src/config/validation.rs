use crate::config::types::{Config, DataConfig, RemoteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_data_config(&config.data)?;
    validate_remote_config(&config.remote)?;
    Ok(())
}

/// Validates local storage configuration
fn validate_data_config(config: &DataConfig) -> Result<(), ConfigError> {
    if config.folder.is_empty() {
        return Err(ConfigError::Validation(
            "data folder cannot be empty".to_string(),
        ));
    }

    if config.catalog_file.is_empty() {
        return Err(ConfigError::Validation(
            "catalog-file cannot be empty".to_string(),
        ));
    }

    if config.catalog_file.contains('/') || config.catalog_file.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "catalog-file must be a plain file name, got '{}'",
            config.catalog_file
        )));
    }

    Ok(())
}

/// Validates remote endpoint configuration
fn validate_remote_config(config: &RemoteConfig) -> Result<(), ConfigError> {
    validate_endpoint("monthly-base-url", &config.monthly_base_url)?;
    validate_endpoint("historical-url", &config.historical_url)?;
    validate_endpoint("slab-url", &config.slab_url)?;

    // Per-year paths are joined onto the base, which only works when the
    // base keeps its trailing slash.
    if !config.monthly_base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "monthly-base-url must end with '/', got '{}'",
            config.monthly_base_url
        )));
    }

    Ok(())
}

fn validate_endpoint(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must be an http(s) URL, got scheme '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::DataConfig;

    fn valid_config() -> Config {
        Config {
            data: DataConfig {
                folder: "/var/lib/gcmt".to_string(),
                catalog_file: "gcmt.db".to_string(),
            },
            remote: RemoteConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_folder_rejected() {
        let mut config = valid_config();
        config.data.folder = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_catalog_file_with_path_rejected() {
        let mut config = valid_config();
        config.data.catalog_file = "nested/gcmt.db".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unparsable_url_rejected() {
        let mut config = valid_config();
        config.remote.monthly_base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = valid_config();
        config.remote.slab_url = "ftp://hazards.example.gov/allslabs.tgz".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_monthly_base_without_trailing_slash_rejected() {
        let mut config = valid_config();
        config.remote.monthly_base_url = "https://archive.example.com/NEW_MONTHLY".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}

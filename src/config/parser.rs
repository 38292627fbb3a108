use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates a configuration file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// SHA-256 hash of the configuration file content, recorded with each
/// synchronization run so a changed configuration is visible in the run
/// history.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config_uses_default_endpoints() {
        let file = create_temp_config(
            r#"
[data]
folder = "/var/lib/gcmt"
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.data.folder, "/var/lib/gcmt");
        assert_eq!(config.data.catalog_file, "gcmt.db");
        assert!(config.remote.monthly_base_url.ends_with("/NEW_MONTHLY/"));
        assert!(config.remote.historical_url.ends_with(".ndk.gz"));
        assert!(config.remote.slab_url.ends_with(".tgz"));
    }

    #[test]
    fn test_load_config_with_overrides() {
        let file = create_temp_config(
            r#"
[data]
folder = "/srv/quakes"
catalog-file = "tensors.db"

[remote]
monthly-base-url = "https://mirror.example.org/gcmt/monthly/"
historical-url = "https://mirror.example.org/gcmt/jan76_dec10.ndk.gz"
slab-url = "https://mirror.example.org/slab/allslabs.tgz"
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.data.catalog_file, "tensors.db");
        assert_eq!(
            config.remote.monthly_base_url,
            "https://mirror.example.org/gcmt/monthly/"
        );
        assert_eq!(
            config.catalog_path(),
            std::path::PathBuf::from("/srv/quakes/tensors.db")
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(
            r#"
[data]
folder = ""
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_compute_config_hash_is_stable() {
        let file = create_temp_config("[data]\nfolder = \"/tmp/x\"\n");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[data]\nfolder = \"/tmp/a\"\n");
        let file2 = create_temp_config("[data]\nfolder = \"/tmp/b\"\n");

        assert_ne!(
            compute_config_hash(file1.path()).unwrap(),
            compute_config_hash(file2.path()).unwrap()
        );
    }
}

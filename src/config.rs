//! Application configuration
//!
//! Loaded from an optional YAML file; every field has a default so an
//! empty or partial file is valid. Command-line flags override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ingest::retention::DEFAULT_MAX_DATASETS;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file path, or `:memory:`
    pub database: String,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    pub max_datasets: usize,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
    /// Default number of datasets returned by listings
    pub list_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: "chemequip.db".to_string(),
            port: 8000,
            cors_origin: None,
            max_datasets: DEFAULT_MAX_DATASETS,
            max_upload_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 30,
            list_limit: 50,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database, "chemequip.db");
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_datasets, 5);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("port: 9000\nmax_datasets: 2\n").expect("valid yaml");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_datasets, 2);
        assert_eq!(config.database, "chemequip.db");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("").expect("empty"), AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(AppConfig::from_yaml("port: not-a-number").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "database: \":memory:\"\ncors_origin: http://localhost:3000").expect("write");
        let config = AppConfig::load_or_default(Some(file.path())).expect("load");
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AppConfig::load(Path::new("/nonexistent/chemequip.yaml")).is_err());
    }
}

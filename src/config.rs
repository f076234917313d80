use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::SourceEncoding;
use crate::data::schema::{ColumnMap, DirectionLabels};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "TRADE_REPORT_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "trade-report.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset opened at start-up.
    pub data_path: Option<PathBuf>,
    /// Candidate encodings, in the order they are tried.
    pub encodings: Vec<SourceEncoding>,
    pub columns: ColumnMap,
    pub directions: DirectionLabels,
    /// Rows shown in each ranking chart.
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: Some(PathBuf::from("data.CSV")),
            encodings: SourceEncoding::DEFAULT_ORDER.to_vec(),
            columns: ColumnMap::default(),
            directions: DirectionLabels::default(),
            top_n: 10,
            histogram_bins: 20,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `$TRADE_REPORT_CONFIG`, else `./trade-report.json` if present, else
    /// defaults. A positional argument overrides the dataset path.
    pub fn resolve(env_path: Option<PathBuf>, data_arg: Option<PathBuf>) -> Result<Self> {
        let mut config = match env_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(path) = data_arg {
            config.data_path = Some(path);
        }
        if config.encodings.is_empty() {
            log::warn!("no encodings configured, falling back to the default order");
            config.encodings = SourceEncoding::DEFAULT_ORDER.to_vec();
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let data_arg = std::env::args_os().nth(1).map(PathBuf::from);
        Self::resolve(env_path, data_arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(
            &path,
            r#"{"top_n": 5, "encodings": ["utf-8"], "columns": {"category": "item"}}"#,
        )
        .unwrap();

        let config = AppConfig::resolve(Some(path), None).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.encodings, vec![SourceEncoding::Utf8]);
        assert_eq!(config.columns.category, "item");
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.data_path, Some(PathBuf::from("data.CSV")));
    }

    #[test]
    fn test_argument_overrides_data_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"encodings": []}"#).unwrap();

        let config = AppConfig::resolve(Some(path), Some("october.csv".into())).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("october.csv")));
        assert_eq!(config.encodings, SourceEncoding::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::resolve(Some(path), None).is_err());
    }
}

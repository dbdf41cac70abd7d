//! Dashboard Configuration
//! Defaults, optional JSON config file and the startup CSV path argument.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "BANK_INSIGHTS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("histogram_bins must be at least 1")]
    ZeroBins,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub title: String,
    pub histogram_bins: usize,
    /// Sample points along each violin outline.
    pub violin_resolution: usize,
    pub width: f32,
    pub height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Ind PBL.csv"),
            title: "Bank Profit Insights Dashboard".to_string(),
            histogram_bins: 30,
            violin_resolution: 64,
            width: 1400.0,
            height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration: defaults, then the JSON file named by
    /// [`CONFIG_ENV`], then the first positional argument as the CSV path.
    pub fn resolve(
        config_file: Option<&Path>,
        data_path_arg: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(data_path) = data_path_arg {
            config.data_path = data_path;
        }
        Ok(config)
    }

    /// Read settings from the process environment and arguments.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let data_path_arg = std::env::args_os().nth(1).map(PathBuf::from);
        Self::resolve(config_file.as_deref(), data_path_arg)
    }

    /// Parse a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_original_dashboard() {
        let config = DashboardConfig::resolve(None, None).unwrap();
        assert_eq!(config.data_path, PathBuf::from("Ind PBL.csv"));
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.title, "Bank Profit Insights Dashboard");
    }

    #[test]
    fn file_overrides_defaults_and_argument_overrides_file() {
        let file = config_file(r#"{ "data_path": "from_file.csv", "histogram_bins": 12 }"#);

        let config = DashboardConfig::resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from_file.csv"));
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.violin_resolution, 64);

        let config =
            DashboardConfig::resolve(Some(file.path()), Some(PathBuf::from("arg.csv"))).unwrap();
        assert_eq!(config.data_path, PathBuf::from("arg.csv"));
    }

    #[test]
    fn rejects_zero_bins_and_unknown_keys() {
        let zero = config_file(r#"{ "histogram_bins": 0 }"#);
        assert!(matches!(
            DashboardConfig::from_file(zero.path()),
            Err(ConfigError::ZeroBins)
        ));

        let unknown = config_file(r#"{ "colour": "blue" }"#);
        assert!(matches!(
            DashboardConfig::from_file(unknown.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = DashboardConfig::from_file(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

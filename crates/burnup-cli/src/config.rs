//! Optional TOML configuration, layered under command-line flags.
//!
//! ```toml
//! [columns]
//! points = "Custom field (Story Points)"
//!
//! [output]
//! root = "reports/burnup"
//!
//! [totals]
//! range_end = "inclusive"
//! ```

use burnup_backlog::ColumnNames;
use burnup_report::{DEFAULT_OUTPUT_ROOT, RangeEnd};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub columns: ColumnNames,
    pub output: OutputConfig,
    pub totals: TotalsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TotalsConfig {
    pub range_end: RangeEnd,
}

impl ConfigFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Effective settings for one run: config file values with flags applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub columns: ColumnNames,
    pub output_root: PathBuf,
    pub range_end: RangeEnd,
}

impl Settings {
    pub fn resolve(
        file: ConfigFile,
        out_dir: Option<String>,
        range_end: Option<RangeEnd>,
    ) -> Self {
        Self {
            columns: file.columns,
            output_root: out_dir.map(PathBuf::from).unwrap_or(file.output.root),
            range_end: range_end.unwrap_or(file.totals.range_end),
        }
    }
}

//! Dashboard configuration: optional TOML file, compiled-in defaults.
//!
//! ```toml
//! [sources]
//! cases = "https://raw.githubusercontent.com/.../time_series_covid19_confirmed_global.csv"
//! deaths = "file:///srv/mirror/deaths.csv"
//! recovered = "/srv/mirror/recovered.csv"
//! timeout_secs = 30
//!
//! [defaults]
//! entity = "Egypt"
//! from = "2020-08-03"
//! to = "2020-09-30"
//! metric = "cases"
//!
//! [export]
//! dir = "exports"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::series::{Metric, SeriesKind};

const JHU_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    pub defaults: InputDefaults,
    pub export: ExportConfig,
}

/// Where the three series come from: `http(s)://` URLs, `file://` URLs, or paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub cases: String,
    pub deaths: String,
    pub recovered: String,
    pub timeout_secs: u64,
}

/// Initial values of the dashboard inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub entity: String,
    pub from: String,
    pub to: String,
    pub metric: Metric,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory; unset means the user's download directory.
    pub dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let url = |kind: SeriesKind| format!("{JHU_BASE_URL}/{}.csv", kind.file_stem());
        Self {
            cases: url(SeriesKind::Cases),
            deaths: url(SeriesKind::Deaths),
            recovered: url(SeriesKind::Recovered),
            timeout_secs: 30,
        }
    }
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            entity: "Egypt".into(),
            from: "2020-08-03".into(),
            to: "2020-09-30".into(),
            metric: Metric::Cases,
        }
    }
}

impl SourceConfig {
    pub fn location(&self, kind: SeriesKind) -> &str {
        match kind {
            SeriesKind::Cases => &self.cases,
            SeriesKind::Deaths => &self.deaths,
            SeriesKind::Recovered => &self.recovered,
        }
    }
}

impl ExportConfig {
    /// Configured directory, else the platform download directory, else `.`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_jhu() {
        let cfg = DashboardConfig::default();
        assert!(cfg
            .sources
            .cases
            .ends_with("time_series_covid19_confirmed_global.csv"));
        assert!(cfg.sources.location(SeriesKind::Recovered).contains("recovered_global"));
        assert_eq!(cfg.defaults.entity, "Egypt");
        assert_eq!(cfg.defaults.metric, Metric::Cases);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg = DashboardConfig::from_toml(
            r#"
[sources]
deaths = "/tmp/deaths.csv"

[defaults]
entity = "Peru"
metric = "deaths"
"#,
        )
        .unwrap();
        assert_eq!(cfg.sources.deaths, "/tmp/deaths.csv");
        assert_eq!(cfg.sources.timeout_secs, 30);
        assert!(cfg.sources.cases.starts_with("https://"));
        assert_eq!(cfg.defaults.entity, "Peru");
        assert_eq!(cfg.defaults.metric, Metric::Deaths);
        assert_eq!(cfg.defaults.from, "2020-08-03");
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = DashboardConfig::default();
        cfg.export.dir = Some(PathBuf::from("exports"));
        let text = cfg.to_toml().unwrap();
        assert_eq!(DashboardConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            DashboardConfig::from_toml("[sources\ncases = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn configured_export_dir_wins() {
        let cfg = ExportConfig {
            dir: Some(PathBuf::from("out")),
        };
        assert_eq!(cfg.resolved_dir(), PathBuf::from("out"));
    }
}

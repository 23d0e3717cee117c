//! Run configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Command-line flags are applied on top by the CLI.
//!
//! ```toml
//! [screen]
//! theme = "記憶體"
//! as_of = "2026-02-20"
//! top_n = 10
//!
//! [http]
//! timeout_secs = 10.0
//!
//! [output]
//! dir = "output"
//! formats = ["md", "json"]
//!
//! [weights]
//! trend = 0.35
//! momentum = 0.25
//! value = 0.20
//! fundamental = 0.15
//! risk_control = 0.05
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sectorscan_core::{CategoryWeights, ScoringError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid weights: {0}")]
    Weights(#[from] ScoringError),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[serde(alias = "markdown")]
    Md,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Md => "md",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(ReportFormat::Md),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(ConfigError::Invalid(format!(
                "unknown report format '{other}' (expected md, json or csv)"
            ))),
        }
    }
}

/// What to screen and how much of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSection {
    pub theme: Option<String>,
    /// Analysis cut-off date; today when absent.
    pub as_of: Option<NaiveDate>,
    pub top_n: usize,
    pub universe_limit: usize,
    pub min_monthly_revenue: f64,
    pub lookback: usize,
    /// Capital used to print a suggested share count per pick.
    pub capital: Option<f64>,
}

impl Default for ScreenSection {
    fn default() -> Self {
        Self {
            theme: None,
            as_of: None,
            top_n: 10,
            universe_limit: 60,
            min_monthly_revenue: 0.0,
            lookback: 252,
            capital: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_secs: f64,
    pub max_attempts: u32,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            max_attempts: 3,
        }
    }
}

impl HttpSection {
    /// `timeout_secs` as a duration; rejects values a `Duration` cannot hold.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs <= 0.0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".into()));
        }
        Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            ConfigError::Invalid(format!("timeout_secs {}: {e}", self.timeout_secs))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub formats: Vec<ReportFormat>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            formats: vec![ReportFormat::Md],
        }
    }
}

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub screen: ScreenSection,
    pub http: HttpSection,
    pub output: OutputSection,
    pub weights: Option<CategoryWeights>,
}

impl ScreenConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn weights(&self) -> CategoryWeights {
        self.weights.unwrap_or_default()
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.screen;
        match &s.theme {
            Some(t) if !t.trim().is_empty() => {}
            _ => return Err(ConfigError::Invalid("a theme is required".into())),
        }
        if s.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if s.universe_limit == 0 {
            return Err(ConfigError::Invalid("universe_limit must be at least 1".into()));
        }
        if s.lookback == 0 {
            return Err(ConfigError::Invalid("lookback must be at least 1".into()));
        }
        if !s.min_monthly_revenue.is_finite() || s.min_monthly_revenue < 0.0 {
            return Err(ConfigError::Invalid(
                "min_monthly_revenue must be a non-negative number".into(),
            ));
        }
        if let Some(capital) = s.capital {
            if !capital.is_finite() || capital <= 0.0 {
                return Err(ConfigError::Invalid("capital must be positive".into()));
            }
        }
        self.http.timeout()?;
        if self.http.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.output.formats.is_empty() {
            return Err(ConfigError::Invalid("at least one output format is required".into()));
        }
        self.weights().validate()?;
        Ok(())
    }
}

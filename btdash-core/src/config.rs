//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! log_level = "info"
//! trend_window = 10
//!
//! [tables]
//! trades_page_size = 20
//! history_page_size = 10
//!
//! [equity_chart]
//! min_width = 300
//! min_height = 120
//!
//! [source]
//! base_url = "http://127.0.0.1:5000"
//! symbol = "ETH-USDT-SWAP"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::request::{BacktestQuery, DEFAULT_INITIAL_EQUITY};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for the analytics views and the binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Rolling win-rate window, in trades.
    pub trend_window: usize,
    pub tables: TableSettings,
    #[serde(deserialize_with = "equity_chart")]
    pub equity_chart: ChartSettings,
    #[serde(deserialize_with = "trend_chart")]
    pub trend_chart: ChartSettings,
    pub source: SourceSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trend_window: 10,
            tables: TableSettings::default(),
            equity_chart: ChartSettings::equity(),
            trend_chart: ChartSettings::trend(),
            source: SourceSettings::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_window == 0 {
            return Err(ConfigError::Invalid("trend_window must be at least 1".into()));
        }
        self.tables.validate()?;
        self.equity_chart.validate("equity_chart")?;
        self.trend_chart.validate("trend_chart")?;
        Ok(())
    }
}

/// Page sizes for the two paginated tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub trades_page_size: usize,
    pub history_page_size: usize,
    /// Choices offered by page-size selectors.
    pub page_size_choices: Vec<usize>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            trades_page_size: 20,
            history_page_size: 10,
            page_size_choices: vec![10, 20, 50, 100],
        }
    }
}

impl TableSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.trades_page_size == 0 || self.history_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be at least 1".into()));
        }
        if self.page_size_choices.iter().any(|&n| n == 0) {
            return Err(ConfigError::Invalid("page_size_choices must be positive".into()));
        }
        Ok(())
    }
}

/// Geometry and styling of one line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Container size in display units when the caller has none of its own.
    pub width: f64,
    pub height: f64,
    /// Backing-surface floor in device pixels.
    pub min_width: u32,
    pub min_height: u32,
    /// Inner padding in display units.
    pub pad_x: f64,
    pub pad_y: f64,
    pub line_width: f64,
    pub stroke_color: String,
    pub background: String,
    pub label_color: String,
}

impl ChartSettings {
    pub fn equity() -> Self {
        Self {
            height: 160.0,
            min_width: 300,
            min_height: 120,
            pad_x: 12.0,
            pad_y: 8.0,
            ..Self::base()
        }
    }

    pub fn trend() -> Self {
        Self {
            min_width: 300,
            min_height: 60,
            pad_x: 6.0,
            pad_y: 6.0,
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            width: 600.0,
            height: 60.0,
            min_width: 300,
            min_height: 60,
            pad_x: 6.0,
            pad_y: 6.0,
            line_width: 1.2,
            stroke_color: "#5be7a9".to_string(),
            background: "rgba(255,255,255,0.03)".to_string(),
            label_color: "rgba(255,255,255,0.6)".to_string(),
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!("{name}: size must be positive")));
        }
        if self.min_width == 0 || self.min_height == 0 {
            return Err(ConfigError::Invalid(format!("{name}: minimum size must be positive")));
        }
        if !(self.pad_x >= 0.0 && self.pad_y >= 0.0) {
            return Err(ConfigError::Invalid(format!("{name}: padding must be non-negative")));
        }
        if !(self.line_width > 0.0) {
            return Err(ConfigError::Invalid(format!("{name}: line_width must be positive")));
        }
        Ok(())
    }
}

/// A chart section as written in TOML: any subset of fields, the rest come
/// from the chart's own defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartOverrides {
    width: Option<f64>,
    height: Option<f64>,
    min_width: Option<u32>,
    min_height: Option<u32>,
    pad_x: Option<f64>,
    pad_y: Option<f64>,
    line_width: Option<f64>,
    stroke_color: Option<String>,
    background: Option<String>,
    label_color: Option<String>,
}

impl ChartOverrides {
    fn apply(self, base: ChartSettings) -> ChartSettings {
        ChartSettings {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            min_width: self.min_width.unwrap_or(base.min_width),
            min_height: self.min_height.unwrap_or(base.min_height),
            pad_x: self.pad_x.unwrap_or(base.pad_x),
            pad_y: self.pad_y.unwrap_or(base.pad_y),
            line_width: self.line_width.unwrap_or(base.line_width),
            stroke_color: self.stroke_color.unwrap_or(base.stroke_color),
            background: self.background.unwrap_or(base.background),
            label_color: self.label_color.unwrap_or(base.label_color),
        }
    }
}

fn equity_chart<'de, D>(deserializer: D) -> Result<ChartSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(ChartOverrides::deserialize(deserializer)?.apply(ChartSettings::equity()))
}

fn trend_chart<'de, D>(deserializer: D) -> Result<ChartSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(ChartOverrides::deserialize(deserializer)?.apply(ChartSettings::trend()))
}

/// Where the binaries fetch data from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub base_url: String,
    /// Saved backtest response; when set, files are read instead of the API.
    pub backtest_file: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub symbol: String,
    pub initial_equity: f64,
    pub position_size: Option<f64>,
    pub leverage: Option<f64>,
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            backtest_file: None,
            history_file: None,
            symbol: "ETH-USDT-SWAP".to_string(),
            initial_equity: DEFAULT_INITIAL_EQUITY,
            position_size: None,
            leverage: None,
            timeout_secs: 30,
        }
    }
}

impl SourceSettings {
    pub fn uses_files(&self) -> bool {
        self.backtest_file.is_some() || self.history_file.is_some()
    }

    pub fn backtest_query(&self) -> BacktestQuery {
        BacktestQuery::new(self.symbol.clone(), self.initial_equity)
            .with_position_size(self.position_size)
            .with_leverage(self.leverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.tables.trades_page_size, 20);
        assert_eq!(config.tables.history_page_size, 10);
        assert_eq!(config.equity_chart.min_height, 120);
        assert_eq!(config.trend_chart.min_height, 60);
        assert_eq!(config.equity_chart.height, 160.0);
        assert_eq!(config.trend_chart.height, 60.0);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
trend_window = 5

[tables]
trades_page_size = 50

[source]
symbol = "BTC-USDT-SWAP"
leverage = 10.0
"#,
        )
        .unwrap();
        assert_eq!(config.trend_window, 5);
        assert_eq!(config.tables.trades_page_size, 50);
        assert_eq!(config.tables.history_page_size, 10);
        assert_eq!(config.source.symbol, "BTC-USDT-SWAP");
        assert_eq!(config.source.backtest_query().leverage, Some(10.0));
        assert!(!config.source.uses_files());
    }

    #[test]
    fn partial_chart_section_keeps_its_own_defaults() {
        let config = DashboardConfig::from_toml("[trend_chart]\nmin_width = 400").unwrap();
        assert_eq!(config.trend_chart.min_width, 400);
        assert_eq!(config.trend_chart.min_height, 60);
        assert_eq!(config.trend_chart.pad_x, 6.0);
        assert_eq!(config.equity_chart, ChartSettings::equity());
    }

    #[test]
    fn zero_window_rejected() {
        let err = DashboardConfig::from_toml("trend_window = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_page_size_rejected() {
        let err = DashboardConfig::from_toml("[tables]\nhistory_page_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = DashboardConfig::from_toml("trend_window = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("btdash.toml");
        std::fs::write(&path, "log_level = \"debug\"").unwrap();
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(DashboardConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Serialized with the same labels `parse` accepts; variant names are aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m", alias = "M1")]
    M1,
    #[serde(rename = "5m", alias = "M5")]
    M5,
    #[serde(rename = "15m", alias = "M15")]
    M15,
    #[serde(rename = "1h", alias = "H1")]
    H1,
    #[serde(rename = "1d", alias = "D1")]
    D1,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::D1 => "1d",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConditionsError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "1h" => Ok(Self::H1),
            "1d" => Ok(Self::D1),
            _ => Err(ConditionsError::InvalidTimeframe(value.to_string())),
        }
    }
}

/// Where the last price sits relative to the prior day's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePosition {
    Inside,
    Outside,
}

impl RangePosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inside => "Inside",
            Self::Outside => "Outside",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendStatus {
    Up,
    Down,
    Neutral,
}

impl TrendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Neutral => "Neutral",
        }
    }
}

/// Last price against the long-period moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlineBias {
    Bullish,
    Bearish,
}

impl TlineBias {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    LowVolatility,
    GoodConditions,
    ChoppyMarket,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Self::LowVolatility => "Low Volatility",
            Self::GoodConditions => "Good Conditions",
            Self::ChoppyMarket => "Choppy Market",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::LowVolatility => "❌",
            Self::GoodConditions => "✅",
            Self::ChoppyMarket => "⚠️",
        }
    }
}

impl Display for RangePosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TrendStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TlineBias {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextPosition {
    TopLeft,
    TopRight,
    Center,
    BottomLeft,
    #[default]
    BottomRight,
}

pub struct Const;

impl Const {
    pub const PRIMARY_SERIES: usize = 0;
    pub const DAILY_SERIES: usize = 1;
    pub const DEFAULT_LOOKBACK_PERIOD: usize = 7;
    pub const DEFAULT_MA_PERIOD: usize = 233;
    pub const VOLATILITY_THRESHOLD: f64 = 50.0;
    pub const APPROX_TOLERANCE: f64 = 1e-10;
    pub const STATUS_TAG: &'static str = "Status";
}

#[derive(Debug)]
pub enum ConditionsError {
    InvalidTimeframe(String),
    InvalidDatetime(String),
    InvalidConfig(String),
    InvalidState(String),
    UnknownSeries(usize),
    Runtime(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Polars(polars::error::PolarsError),
}

impl Display for ConditionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeframe(v) => write!(f, "invalid timeframe: {v}"),
            Self::InvalidDatetime(v) => write!(f, "invalid datetime: {v}"),
            Self::InvalidConfig(v) => write!(f, "invalid config: {v}"),
            Self::InvalidState(v) => write!(f, "invalid state: {v}"),
            Self::UnknownSeries(idx) => write!(f, "unknown bar series index: {idx}"),
            Self::Runtime(v) => write!(f, "runtime error: {v}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Polars(e) => write!(f, "polars error: {e}"),
        }
    }
}

impl std::error::Error for ConditionsError {}

impl From<std::io::Error> for ConditionsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ConditionsError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for ConditionsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for ConditionsError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<polars::error::PolarsError> for ConditionsError {
    fn from(value: polars::error::PolarsError) -> Self {
        Self::Polars(value)
    }
}

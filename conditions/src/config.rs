use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant::{ConditionsError, Const, TextPosition, Timeframe};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Daily bars required before volatility is computed; also the ATR period.
    pub lookback_period: usize,
    pub ma_period: usize,
    pub instrument: String,
    pub primary_timeframe: Timeframe,
    pub tag: String,
    pub text_position: TextPosition,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            lookback_period: Const::DEFAULT_LOOKBACK_PERIOD,
            ma_period: Const::DEFAULT_MA_PERIOD,
            instrument: String::new(),
            primary_timeframe: Timeframe::M5,
            tag: Const::STATUS_TAG.to_string(),
            text_position: TextPosition::default(),
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConditionsError> {
        if self.lookback_period < 1 {
            return Err(ConditionsError::InvalidConfig(
                "lookback_period must be >= 1".to_string(),
            ));
        }
        if self.ma_period < 1 {
            return Err(ConditionsError::InvalidConfig(
                "ma_period must be >= 1".to_string(),
            ));
        }
        if self.primary_timeframe == Timeframe::D1 {
            return Err(ConditionsError::InvalidConfig(
                "primary series must be intraday".to_string(),
            ));
        }
        if self.tag.trim().is_empty() {
            return Err(ConditionsError::InvalidConfig("tag must not be empty".to_string()));
        }
        Ok(())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<IndicatorConfig, ConditionsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let config: IndicatorConfig = match path.extension().and_then(|x| x.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            _ => {
                return Err(ConditionsError::InvalidConfig(format!(
                    "unsupported config file format: {}",
                    path.display()
                )));
            }
        };

        config.validate()?;
        Ok(config)
    }
}

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::bar::Bar;
use crate::constant::{ConditionsError, Timeframe};
use crate::tick::{MarketDataEvent, MarketDataType};

#[derive(Debug, Deserialize)]
struct CsvBarRow {
    #[serde(alias = "date")]
    datetime: String,
    #[serde(alias = "open")]
    open_price: f64,
    #[serde(alias = "high")]
    high_price: f64,
    #[serde(alias = "low")]
    low_price: f64,
    #[serde(alias = "close")]
    close_price: f64,
    #[serde(default)]
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct CsvTickRow {
    datetime: String,
    #[serde(alias = "last", alias = "last_price")]
    price: f64,
    #[serde(default)]
    volume: f64,
    #[serde(default = "default_tick_type", alias = "type")]
    market_data_type: MarketDataType,
}

fn default_tick_type() -> MarketDataType {
    MarketDataType::Last
}

pub fn load_bars(
    file_path: impl AsRef<Path>,
    symbol: impl Into<String>,
    timeframe: Timeframe,
) -> Result<Vec<Bar>, ConditionsError> {
    let symbol = symbol.into();
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut out = Vec::new();

    for row in reader.deserialize::<CsvBarRow>() {
        let row = row?;
        out.push(Bar {
            symbol: symbol.clone(),
            timeframe,
            datetime: parse_datetime(&row.datetime)?,
            open_price: row.open_price,
            high_price: row.high_price,
            low_price: row.low_price,
            close_price: row.close_price,
            volume: row.volume,
        });
    }

    Ok(out)
}

pub fn load_ticks(file_path: impl AsRef<Path>) -> Result<Vec<MarketDataEvent>, ConditionsError> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut out = Vec::new();

    for row in reader.deserialize::<CsvTickRow>() {
        let row = row?;
        out.push(MarketDataEvent {
            market_data_type: row.market_data_type,
            datetime: parse_datetime(&row.datetime)?,
            price: row.price,
            volume: row.volume,
        });
    }

    Ok(out)
}

pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ConditionsError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let patterns = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y%m%d%H%M%S%.f",
    ];

    for pattern in patterns {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for pattern in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
            }
        }
    }

    Err(ConditionsError::InvalidDatetime(value.to_string()))
}

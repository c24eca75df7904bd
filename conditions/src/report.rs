//! Per-bar condition history with dataframe and parquet export.

use std::fs::{File, create_dir_all};
use std::path::Path;

use chrono::{DateTime, Utc};
use polars::df;
use polars::prelude::{DataFrame, ParquetWriter};

use crate::constant::{ConditionsError, Verdict};
use crate::evaluator::ConditionSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionRecord {
    pub datetime: DateTime<Utc>,
    pub last_price: f64,
    pub snapshot: ConditionSnapshot,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default)]
pub struct ConditionHistory {
    symbol: String,
    rows: Vec<ConditionRecord>,
}

impl ConditionHistory {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ConditionRecord) {
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[ConditionRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&ConditionRecord> {
        self.rows.last()
    }

    pub fn dataframe(&self) -> Result<DataFrame, ConditionsError> {
        let label = |x: Option<&'static str>| x.unwrap_or_default().to_string();
        let df = df!(
            "datetime" => self.rows.iter().map(|x| x.datetime.timestamp_millis()).collect::<Vec<_>>(),
            "symbol" => self.rows.iter().map(|_| self.symbol.clone()).collect::<Vec<_>>(),
            "last_price" => self.rows.iter().map(|x| x.last_price).collect::<Vec<_>>(),
            "volatility_percent" => self.rows.iter().map(|x| x.snapshot.volatility_percent).collect::<Vec<_>>(),
            "range_position" => self.rows.iter().map(|x| label(x.snapshot.range_position.map(|v| v.as_str()))).collect::<Vec<_>>(),
            "trend_status" => self.rows.iter().map(|x| label(x.snapshot.trend_status.map(|v| v.as_str()))).collect::<Vec<_>>(),
            "tline_bias" => self.rows.iter().map(|x| label(x.snapshot.tline_bias.map(|v| v.as_str()))).collect::<Vec<_>>(),
            "verdict" => self.rows.iter().map(|x| x.verdict.label().to_string()).collect::<Vec<_>>()
        )?;
        Ok(df)
    }

    pub fn write_parquet(&self, path: impl AsRef<Path>) -> Result<(), ConditionsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let mut df = self.dataframe()?;
        let mut file = File::create(path)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }
}

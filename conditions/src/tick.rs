use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataType {
    Last,
    Bid,
    Ask,
    DailyHigh,
    DailyLow,
    DailyVolume,
    Settlement,
}

#[derive(Debug, Clone)]
pub struct MarketDataEvent {
    pub market_data_type: MarketDataType,
    pub datetime: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
}

impl MarketDataEvent {
    pub fn last(datetime: DateTime<Utc>, price: f64, volume: f64) -> Self {
        Self {
            market_data_type: MarketDataType::Last,
            datetime,
            price,
            volume,
        }
    }
}

/// Latest traded price.
///
/// Starts at 0.0 and only moves on `Last` events, so until the first trade of
/// a session arrives every range and trend comparison runs against 0.0.
#[derive(Debug, Clone, Default)]
pub struct LastPriceTracker {
    price: f64,
    updated_at: Option<DateTime<Utc>>,
    updates: u64,
}

impl LastPriceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the event moved the tracked price.
    pub fn on_market_data(&mut self, event: &MarketDataEvent) -> bool {
        if event.market_data_type != MarketDataType::Last {
            return false;
        }
        self.price = event.price;
        self.updated_at = Some(event.datetime);
        self.updates += 1;
        true
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

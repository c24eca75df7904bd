use chrono::{DateTime, NaiveDate, Utc};

use crate::constant::Timeframe;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub datetime: DateTime<Utc>,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl Bar {
    pub fn session_date(&self) -> NaiveDate {
        self.datetime.date_naive()
    }

    /// Opens a daily bar seeded from the first intraday bar of its date.
    pub fn daily_from(intraday: &Bar) -> Self {
        Self {
            symbol: intraday.symbol.clone(),
            timeframe: Timeframe::D1,
            datetime: intraday.datetime,
            open_price: intraday.open_price,
            high_price: intraday.high_price,
            low_price: intraday.low_price,
            close_price: intraday.close_price,
            volume: intraday.volume,
        }
    }

    /// Folds a later bar of the same session into this one.
    pub fn absorb(&mut self, later: &Bar) {
        self.high_price = self.high_price.max(later.high_price);
        self.low_price = self.low_price.min(later.low_price);
        self.close_price = later.close_price;
        self.volume += later.volume;
        self.datetime = later.datetime;
    }
}

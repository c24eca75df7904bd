//! Bar series owned by the in-process host.
//!
//! Index 0 is always the primary series; series added during `Configure` get
//! the next free index, so the daily series requested by the indicator sits at
//! index 1. Indicators attached to a series are backfilled over existing
//! history and then kept current on every push.

use tracing::{debug, warn};

use crate::bar::Bar;
use crate::constant::{ConditionsError, Const, Timeframe};
use crate::indicator::{Indicator, IndicatorManager};

pub struct Series {
    timeframe: Timeframe,
    bars: Vec<Bar>,
    indicators: IndicatorManager,
}

impl Series {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            bars: Vec::new(),
            indicators: IndicatorManager::default(),
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn count(&self) -> usize {
        self.bars.len()
    }

    /// Bar `bars_ago` positions back from the most recent one.
    pub fn get(&self, bars_ago: usize) -> Option<&Bar> {
        let idx = self.bars.len().checked_sub(bars_ago + 1)?;
        self.bars.get(idx)
    }

    pub fn high(&self, bars_ago: usize) -> Option<f64> {
        self.get(bars_ago).map(|x| x.high_price)
    }

    pub fn low(&self, bars_ago: usize) -> Option<f64> {
        self.get(bars_ago).map(|x| x.low_price)
    }

    pub fn indicators(&self) -> &IndicatorManager {
        &self.indicators
    }

    pub fn attach(&mut self, indicator: Box<dyn Indicator>) -> String {
        self.indicators.register(indicator, &self.bars)
    }

    pub fn push(&mut self, bar: Bar) {
        self.indicators.update(&bar);
        self.bars.push(bar);
    }

    /// Replaces the most recent bar in place and revises indicators for it.
    pub fn revise_last(&mut self, bar: Bar) {
        if self.bars.is_empty() {
            self.push(bar);
            return;
        }
        self.indicators.revise(&bar);
        if let Some(last) = self.bars.last_mut() {
            *last = bar;
        }
    }
}

pub struct SeriesSet {
    series: Vec<Series>,
}

impl SeriesSet {
    pub fn new(primary: Timeframe) -> Self {
        Self {
            series: vec![Series::new(primary)],
        }
    }

    /// Adds a secondary series and returns its index.
    pub fn add_data_series(&mut self, timeframe: Timeframe) -> usize {
        self.series.push(Series::new(timeframe));
        let idx = self.series.len() - 1;
        debug!(idx, timeframe = timeframe.as_str(), "added data series");
        idx
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Series> {
        self.series.get(idx)
    }

    pub fn primary(&self) -> &Series {
        &self.series[Const::PRIMARY_SERIES]
    }

    pub fn daily(&self) -> Option<&Series> {
        self.series.get(Const::DAILY_SERIES)
    }

    /// Bar count of a series; unknown indices count as empty.
    pub fn count(&self, idx: usize) -> usize {
        self.series.get(idx).map(Series::count).unwrap_or(0)
    }

    pub fn attach(
        &mut self,
        idx: usize,
        indicator: Box<dyn Indicator>,
    ) -> Result<String, ConditionsError> {
        let series = self
            .series
            .get_mut(idx)
            .ok_or(ConditionsError::UnknownSeries(idx))?;
        Ok(series.attach(indicator))
    }

    /// Appends a completed bar to the given series.
    ///
    /// On the daily series a bar of the same session date as the latest one
    /// replaces it, so a completed daily bar supersedes the developing bar
    /// folded from intraday data. Daily bars older than the latest are dropped.
    pub fn push_bar(&mut self, idx: usize, bar: Bar) -> Result<(), ConditionsError> {
        let series = self
            .series
            .get_mut(idx)
            .ok_or(ConditionsError::UnknownSeries(idx))?;
        if idx != Const::DAILY_SERIES {
            series.push(bar);
            return Ok(());
        }

        let date = bar.session_date();
        match series.get(0).map(Bar::session_date) {
            Some(last_date) if date == last_date => series.revise_last(bar),
            Some(last_date) if date < last_date => {
                warn!(
                    bar_date = %date,
                    daily_date = %last_date,
                    "daily bar older than latest daily bar, dropped"
                );
            }
            _ => series.push(bar),
        }
        Ok(())
    }

    /// Appends a primary bar and folds it into the developing daily bar of its
    /// session date when a daily series has been added.
    pub fn push_primary(&mut self, bar: Bar) {
        if let Some(daily) = self.series.get_mut(Const::DAILY_SERIES) {
            fold_into_daily(daily, &bar);
        }
        self.series[Const::PRIMARY_SERIES].push(bar);
    }
}

fn fold_into_daily(daily: &mut Series, bar: &Bar) {
    let date = bar.session_date();
    let Some(last_date) = daily.get(0).map(Bar::session_date) else {
        daily.push(Bar::daily_from(bar));
        return;
    };

    if date == last_date {
        if let Some(mut developing) = daily.get(0).cloned() {
            developing.absorb(bar);
            daily.revise_last(developing);
        }
    } else if date > last_date {
        daily.push(Bar::daily_from(bar));
    } else {
        warn!(
            bar_date = %date,
            daily_date = %last_date,
            "intraday bar older than latest daily bar, not folded"
        );
    }
}

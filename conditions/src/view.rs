use crate::constant::Const;
use crate::series::SeriesSet;

/// Read-only capability surface the evaluator works against.
///
/// `bars_ago` 0 is today's (developing) daily bar, 1 the prior day.
pub trait MarketView {
    fn daily_high(&self, bars_ago: usize) -> Option<f64>;
    fn daily_low(&self, bars_ago: usize) -> Option<f64>;
    fn smoothed_volatility(&self) -> Option<f64>;
    fn moving_average(&self) -> Option<f64>;
    fn bar_count(&self, series_index: usize) -> usize;
}

/// `MarketView` over a host `SeriesSet`, resolving the two indicator handles
/// obtained when the indicator attached its calculators.
pub struct SeriesView<'a> {
    series: &'a SeriesSet,
    volatility_handle: &'a str,
    average_handle: &'a str,
}

impl<'a> SeriesView<'a> {
    pub fn new(series: &'a SeriesSet, volatility_handle: &'a str, average_handle: &'a str) -> Self {
        Self {
            series,
            volatility_handle,
            average_handle,
        }
    }
}

impl MarketView for SeriesView<'_> {
    fn daily_high(&self, bars_ago: usize) -> Option<f64> {
        self.series.daily()?.high(bars_ago)
    }

    fn daily_low(&self, bars_ago: usize) -> Option<f64> {
        self.series.daily()?.low(bars_ago)
    }

    fn smoothed_volatility(&self) -> Option<f64> {
        self.series
            .daily()?
            .indicators()
            .value(self.volatility_handle)
    }

    fn moving_average(&self) -> Option<f64> {
        self.series
            .primary()
            .indicators()
            .value(self.average_handle)
    }

    fn bar_count(&self, series_index: usize) -> usize {
        self.series.count(series_index)
    }
}

/// Fixed values, for driving the evaluator without a host.
#[derive(Debug, Clone, Default)]
pub struct StaticView {
    /// Daily (high, low) pairs, oldest first.
    pub daily: Vec<(f64, f64)>,
    pub smoothed_volatility: Option<f64>,
    pub moving_average: Option<f64>,
    pub primary_count: usize,
}

impl StaticView {
    fn daily_at(&self, bars_ago: usize) -> Option<(f64, f64)> {
        let idx = self.daily.len().checked_sub(bars_ago + 1)?;
        self.daily.get(idx).copied()
    }
}

impl MarketView for StaticView {
    fn daily_high(&self, bars_ago: usize) -> Option<f64> {
        self.daily_at(bars_ago).map(|(high, _)| high)
    }

    fn daily_low(&self, bars_ago: usize) -> Option<f64> {
        self.daily_at(bars_ago).map(|(_, low)| low)
    }

    fn smoothed_volatility(&self) -> Option<f64> {
        self.smoothed_volatility
    }

    fn moving_average(&self) -> Option<f64> {
        self.moving_average
    }

    fn bar_count(&self, series_index: usize) -> usize {
        match series_index {
            Const::PRIMARY_SERIES => self.primary_count,
            Const::DAILY_SERIES => self.daily.len(),
            _ => 0,
        }
    }
}

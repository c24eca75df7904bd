use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::classifier::classify;
use crate::constant::{Const, RangePosition, TlineBias, TrendStatus, Verdict};
use crate::utils::approx_zero;
use crate::view::MarketView;

/// Derived fields of one evaluation cycle.
///
/// The default value is what a freshly loaded indicator shows before warm-up
/// completes: zero volatility and no labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConditionSnapshot {
    pub volatility_percent: f64,
    pub range_position: Option<RangePosition>,
    pub trend_status: Option<TrendStatus>,
    pub tline_bias: Option<TlineBias>,
}

impl ConditionSnapshot {
    pub fn verdict(&self) -> Verdict {
        classify(
            self.volatility_percent,
            self.trend_status.unwrap_or(TrendStatus::Neutral),
        )
    }
}

/// Reason an evaluation cycle was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmUp {
    NoDailyBars,
    DailyBelowLookback { have: usize, need: usize },
    NoPriorDay,
    PrimaryBelowAverage { have: usize, need: usize },
    MissingValue(&'static str),
}

impl Display for WarmUp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDailyBars => write!(f, "no daily bars"),
            Self::DailyBelowLookback { have, need } => {
                write!(f, "daily bars {have} below lookback {need}")
            }
            Self::NoPriorDay => write!(f, "prior day not available"),
            Self::PrimaryBelowAverage { have, need } => {
                write!(f, "primary bars {have} below moving average period {need}")
            }
            Self::MissingValue(what) => write!(f, "{what} not available"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionEvaluator {
    lookback_period: usize,
    ma_period: usize,
}

impl Default for ConditionEvaluator {
    fn default() -> Self {
        Self::new(Const::DEFAULT_LOOKBACK_PERIOD, Const::DEFAULT_MA_PERIOD)
    }
}

impl ConditionEvaluator {
    pub fn new(lookback_period: usize, ma_period: usize) -> Self {
        assert!(lookback_period > 0, "lookback period must be > 0");
        assert!(ma_period > 0, "moving average period must be > 0");
        Self {
            lookback_period,
            ma_period,
        }
    }

    pub fn lookback_period(&self) -> usize {
        self.lookback_period
    }

    pub fn ma_period(&self) -> usize {
        self.ma_period
    }

    /// Checks that enough history is loaded for a full evaluation.
    pub fn check_ready(&self, view: &impl MarketView) -> Result<(), WarmUp> {
        let daily = view.bar_count(Const::DAILY_SERIES);
        if daily < 1 {
            return Err(WarmUp::NoDailyBars);
        }
        if daily < self.lookback_period {
            return Err(WarmUp::DailyBelowLookback {
                have: daily,
                need: self.lookback_period,
            });
        }
        if daily < 2 {
            return Err(WarmUp::NoPriorDay);
        }
        let primary = view.bar_count(Const::PRIMARY_SERIES);
        if primary < self.ma_period {
            return Err(WarmUp::PrimaryBelowAverage {
                have: primary,
                need: self.ma_period,
            });
        }
        Ok(())
    }

    /// Runs one cycle. Any failed precondition returns `prior` unchanged.
    pub fn evaluate(
        &self,
        view: &impl MarketView,
        last_price: f64,
        prior: &ConditionSnapshot,
    ) -> ConditionSnapshot {
        match self.try_evaluate(view, last_price, prior) {
            Ok(snapshot) => snapshot,
            Err(reason) => {
                debug!(%reason, "skipping condition evaluation");
                *prior
            }
        }
    }

    fn try_evaluate(
        &self,
        view: &impl MarketView,
        last_price: f64,
        prior: &ConditionSnapshot,
    ) -> Result<ConditionSnapshot, WarmUp> {
        self.check_ready(view)?;

        let prior_high = view
            .daily_high(1)
            .ok_or(WarmUp::MissingValue("prior daily high"))?;
        let prior_low = view
            .daily_low(1)
            .ok_or(WarmUp::MissingValue("prior daily low"))?;
        let moving_average = view
            .moving_average()
            .ok_or(WarmUp::MissingValue("moving average"))?;

        let (range_position, trend_status) = range_and_trend(last_price, prior_high, prior_low);
        let volatility_percent = self
            .volatility_percent(view)
            .unwrap_or(prior.volatility_percent);
        let tline_bias = tline_bias(last_price, moving_average);

        debug!(
            last_price,
            prior_high,
            prior_low,
            range = range_position.as_str(),
            trend = trend_status.as_str(),
            volatility_percent,
            "conditions evaluated"
        );

        Ok(ConditionSnapshot {
            volatility_percent,
            range_position: Some(range_position),
            trend_status: Some(trend_status),
            tline_bias: Some(tline_bias),
        })
    }

    /// Today's daily range as a percentage of the smoothed daily volatility.
    /// `None` when the denominator is indistinguishable from zero.
    pub fn volatility_percent(&self, view: &impl MarketView) -> Option<f64> {
        if view.bar_count(Const::DAILY_SERIES) < self.lookback_period {
            return None;
        }
        let atr = view.smoothed_volatility()?;
        if approx_zero(atr) {
            debug!(atr, "smoothed volatility is zero, keeping prior ratio");
            return None;
        }
        let high = view.daily_high(0)?;
        let low = view.daily_low(0)?;
        Some((high - low) / atr * 100.0)
    }
}

/// Range position uses inclusive bounds, trend uses exclusive ones, so a price
/// exactly on the prior high is Inside and Neutral.
pub fn range_and_trend(last_price: f64, prior_high: f64, prior_low: f64) -> (RangePosition, TrendStatus) {
    let range = if last_price <= prior_high && last_price >= prior_low {
        RangePosition::Inside
    } else {
        RangePosition::Outside
    };

    let trend = if last_price > prior_high {
        TrendStatus::Up
    } else if last_price < prior_low {
        TrendStatus::Down
    } else {
        TrendStatus::Neutral
    };

    (range, trend)
}

pub fn tline_bias(last_price: f64, moving_average: f64) -> TlineBias {
    if last_price > moving_average {
        TlineBias::Bullish
    } else {
        TlineBias::Bearish
    }
}

//! The conditions indicator and its lifecycle.
//!
//! The host drives the indicator through three callbacks:
//! - `on_state_change`: declare defaults, request the daily series, attach
//!   the ATR and EMA calculators once data is loaded;
//! - `on_market_data`: track the last traded price;
//! - `on_bar_update`: evaluate, classify and redraw the overlay.

use tracing::{debug, info};

use crate::config::IndicatorConfig;
use crate::constant::{ConditionsError, Const, Timeframe, Verdict};
use crate::evaluator::{ConditionEvaluator, ConditionSnapshot, WarmUp};
use crate::indicator::{Atr, Ema};
use crate::presentation::{DrawSurface, render};
use crate::series::SeriesSet;
use crate::tick::{LastPriceTracker, MarketDataEvent};
use crate::view::SeriesView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    SetDefaults,
    Configure,
    DataLoaded,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calculate {
    OnBarClose,
    OnEachTick,
    OnPriceChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorProperties {
    pub name: String,
    pub description: String,
    pub calculate: Calculate,
    pub is_overlay: bool,
    pub is_suspended_while_inactive: bool,
}

impl Default for IndicatorProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            calculate: Calculate::OnBarClose,
            is_overlay: false,
            is_suspended_while_inactive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarUpdate {
    WarmingUp(WarmUp),
    Drawn {
        snapshot: ConditionSnapshot,
        verdict: Verdict,
        text: String,
    },
}

pub struct ConditionsIndicator {
    config: IndicatorConfig,
    properties: IndicatorProperties,
    state: Option<State>,
    evaluator: ConditionEvaluator,
    last_price: LastPriceTracker,
    snapshot: ConditionSnapshot,
    volatility_handle: Option<String>,
    average_handle: Option<String>,
}

impl ConditionsIndicator {
    pub fn new(config: IndicatorConfig) -> Result<Self, ConditionsError> {
        config.validate()?;
        let evaluator = ConditionEvaluator::new(config.lookback_period, config.ma_period);
        Ok(Self {
            config,
            properties: IndicatorProperties::default(),
            state: None,
            evaluator,
            last_price: LastPriceTracker::new(),
            snapshot: ConditionSnapshot::default(),
            volatility_handle: None,
            average_handle: None,
        })
    }

    pub fn on_state_change(
        &mut self,
        state: State,
        series: &mut SeriesSet,
    ) -> Result<(), ConditionsError> {
        let expected = match state {
            State::SetDefaults => self.state.is_none(),
            State::Configure => self.state == Some(State::SetDefaults),
            State::DataLoaded => self.state == Some(State::Configure),
            State::Terminated => true,
        };
        if !expected {
            return Err(ConditionsError::InvalidState(format!(
                "{:?} cannot follow {:?}",
                state, self.state
            )));
        }

        match state {
            State::SetDefaults => {
                self.properties = IndicatorProperties {
                    name: "TDGConditions".to_string(),
                    description: "Trading conditions analyzer: a quick general view of market condition in real time.".to_string(),
                    calculate: Calculate::OnEachTick,
                    is_overlay: true,
                    is_suspended_while_inactive: true,
                };
            }
            State::Configure => {
                let idx = series.add_data_series(Timeframe::D1);
                if idx != Const::DAILY_SERIES {
                    return Err(ConditionsError::InvalidState(format!(
                        "daily series landed at index {idx}, expected {}",
                        Const::DAILY_SERIES
                    )));
                }
            }
            State::DataLoaded => {
                let atr = series.attach(
                    Const::DAILY_SERIES,
                    Box::new(Atr::new(self.config.lookback_period)),
                )?;
                let ema = series.attach(
                    Const::PRIMARY_SERIES,
                    Box::new(Ema::new(self.config.ma_period)),
                )?;
                info!(
                    instrument = %self.config.instrument,
                    atr = %atr,
                    ema = %ema,
                    "indicator data loaded"
                );
                self.volatility_handle = Some(atr);
                self.average_handle = Some(ema);
            }
            State::Terminated => {
                self.volatility_handle = None;
                self.average_handle = None;
            }
        }

        self.state = Some(state);
        Ok(())
    }

    pub fn on_market_data(&mut self, event: &MarketDataEvent) {
        self.last_price.on_market_data(event);
    }

    pub fn on_bar_update<S: DrawSurface + ?Sized>(
        &mut self,
        series: &SeriesSet,
        surface: &mut S,
    ) -> Result<BarUpdate, ConditionsError> {
        let (Some(volatility_handle), Some(average_handle)) =
            (self.volatility_handle.as_deref(), self.average_handle.as_deref())
        else {
            return Err(ConditionsError::InvalidState(format!(
                "bar update before data loaded (state {:?})",
                self.state
            )));
        };

        let view = SeriesView::new(series, volatility_handle, average_handle);
        if let Err(reason) = self.evaluator.check_ready(&view) {
            debug!(%reason, "indicator warming up");
            return Ok(BarUpdate::WarmingUp(reason));
        }

        self.snapshot = self
            .evaluator
            .evaluate(&view, self.last_price.price(), &self.snapshot);
        let text = render(
            surface,
            &self.config.tag,
            self.config.text_position,
            &self.config.instrument,
            &self.snapshot,
        );

        Ok(BarUpdate::Drawn {
            snapshot: self.snapshot,
            verdict: self.snapshot.verdict(),
            text,
        })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn properties(&self) -> &IndicatorProperties {
        &self.properties
    }

    pub fn state(&self) -> Option<State> {
        self.state
    }

    pub fn snapshot(&self) -> &ConditionSnapshot {
        &self.snapshot
    }

    pub fn last_price(&self) -> f64 {
        self.last_price.price()
    }

    pub fn price_tracker(&self) -> &LastPriceTracker {
        &self.last_price
    }
}

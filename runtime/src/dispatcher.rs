//! Single-threaded event dispatch.
//!
//! `Dispatcher` owns the indicator, the bar series and the chart overlay, and
//! applies host events strictly in the order they are given.

use chrono::{DateTime, Utc};
use conditions::{
	Bar, BarUpdate, ChartOverlay, ConditionHistory, ConditionRecord, ConditionSnapshot,
	ConditionsError, ConditionsIndicator, Const, IndicatorConfig, MarketDataEvent, SeriesSet,
	State,
};
use tracing::{debug, info};

/// Event delivered by the host loop.
#[derive(Debug, Clone)]
pub enum HostEvent {
	/// Trade/quote update; only moves the tracked last price.
	MarketData(MarketDataEvent),
	/// A closed bar for the given series index (0 primary, 1 daily).
	Bar { series_index: usize, bar: Bar },
}

/// Summary returned when a dispatcher is finished.
#[derive(Debug, Clone)]
pub struct RuntimeReport {
	pub ticks: u64,
	/// Ticks that moved the last price.
	pub trades: u64,
	pub last_trade_at: Option<DateTime<Utc>>,
	pub bars: u64,
	pub drawn: u64,
	pub warming_up: u64,
	pub overlay: Option<String>,
	pub snapshot: ConditionSnapshot,
	pub history: ConditionHistory,
}

pub struct Dispatcher {
	indicator: ConditionsIndicator,
	series: SeriesSet,
	overlay: ChartOverlay,
	history: ConditionHistory,
	ticks: u64,
	bars: u64,
	drawn: u64,
	warming_up: u64,
}

impl Dispatcher {
	/// Builds the indicator and walks it through `SetDefaults`, `Configure`
	/// and `DataLoaded`.
	pub fn new(config: IndicatorConfig) -> Result<Self, ConditionsError> {
		let mut series = SeriesSet::new(config.primary_timeframe);
		let history = ConditionHistory::new(config.instrument.clone());
		let mut indicator = ConditionsIndicator::new(config)?;
		for state in [State::SetDefaults, State::Configure, State::DataLoaded] {
			indicator.on_state_change(state, &mut series)?;
		}
		info!(
			name = %indicator.properties().name,
			series = series.len(),
			"dispatcher ready"
		);

		Ok(Self {
			indicator,
			series,
			overlay: ChartOverlay::new(),
			history,
			ticks: 0,
			bars: 0,
			drawn: 0,
			warming_up: 0,
		})
	}

	pub fn dispatch(&mut self, event: HostEvent) -> Result<Option<BarUpdate>, ConditionsError> {
		match event {
			HostEvent::MarketData(event) => {
				self.ticks += 1;
				self.indicator.on_market_data(&event);
				Ok(None)
			}
			HostEvent::Bar { series_index, bar } => {
				self.bars += 1;
				let datetime = bar.datetime;
				if series_index == Const::PRIMARY_SERIES {
					self.series.push_primary(bar);
				} else {
					self.series.push_bar(series_index, bar)?;
				}

				let update = self.indicator.on_bar_update(&self.series, &mut self.overlay)?;
				match &update {
					BarUpdate::WarmingUp(reason) => {
						self.warming_up += 1;
						debug!(series_index, %reason, "bar processed during warm-up");
					}
					BarUpdate::Drawn {
						snapshot, verdict, ..
					} => {
						self.drawn += 1;
						self.history.push(ConditionRecord {
							datetime,
							last_price: self.indicator.last_price(),
							snapshot: *snapshot,
							verdict: *verdict,
						});
					}
				}
				Ok(Some(update))
			}
		}
	}

	pub fn indicator(&self) -> &ConditionsIndicator {
		&self.indicator
	}

	pub fn series(&self) -> &SeriesSet {
		&self.series
	}

	pub fn overlay(&self) -> &ChartOverlay {
		&self.overlay
	}

	/// Terminates the indicator and returns the run summary.
	pub fn finish(mut self) -> Result<RuntimeReport, ConditionsError> {
		self.indicator
			.on_state_change(State::Terminated, &mut self.series)?;
		let overlay = self
			.overlay
			.get(&self.indicator.config().tag)
			.map(|x| x.text.clone());
		let tracker = self.indicator.price_tracker();
		let trades = tracker.updates();
		let last_trade_at = tracker.updated_at();
		info!(
			ticks = self.ticks,
			trades,
			last_trade_at = ?last_trade_at,
			bars = self.bars,
			drawn = self.drawn,
			warming_up = self.warming_up,
			"dispatcher finished"
		);

		Ok(RuntimeReport {
			ticks: self.ticks,
			trades,
			last_trade_at,
			bars: self.bars,
			drawn: self.drawn,
			warming_up: self.warming_up,
			overlay,
			snapshot: *self.indicator.snapshot(),
			history: self.history,
		})
	}
}

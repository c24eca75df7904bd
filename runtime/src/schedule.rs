use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use conditions::{Bar, Const, MarketDataEvent};

use crate::dispatcher::HostEvent;

/// One `Last` tick per primary bar at its close price and timestamp.
pub fn synthesize_ticks(primary: &[Bar]) -> Vec<MarketDataEvent> {
	primary
		.iter()
		.map(|bar| MarketDataEvent::last(bar.datetime, bar.close_price, bar.volume))
		.collect()
}

/// Merges the three inputs into host delivery order.
///
/// Events are ordered by timestamp; at equal timestamps daily bars come first,
/// then ticks, then primary bars, so a primary bar sees the trade that closed it.
///
/// A daily bar whose session date has primary bars is held back until the last
/// primary bar of that date and delivered right after it. Until then the
/// developing daily bar is the one folded from intraday data.
pub fn schedule_events(
	primary: Vec<Bar>,
	daily: Vec<Bar>,
	ticks: Vec<MarketDataEvent>,
) -> Vec<HostEvent> {
	let mut session_close: HashMap<NaiveDate, DateTime<Utc>> = HashMap::new();
	for bar in &primary {
		let close = session_close.entry(bar.session_date()).or_insert(bar.datetime);
		if bar.datetime > *close {
			*close = bar.datetime;
		}
	}

	let mut keyed = Vec::with_capacity(primary.len() + daily.len() + ticks.len());
	for bar in daily {
		let (datetime, rank) = match session_close.get(&bar.session_date()) {
			Some(close) => (bar.datetime.max(*close), 3u8),
			None => (bar.datetime, 0u8),
		};
		keyed.push((
			datetime,
			rank,
			HostEvent::Bar {
				series_index: Const::DAILY_SERIES,
				bar,
			},
		));
	}
	for tick in ticks {
		keyed.push((tick.datetime, 1u8, HostEvent::MarketData(tick)));
	}
	for bar in primary {
		keyed.push((
			bar.datetime,
			2u8,
			HostEvent::Bar {
				series_index: Const::PRIMARY_SERIES,
				bar,
			},
		));
	}

	keyed.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
	keyed.into_iter().map(|(_, _, event)| event).collect()
}

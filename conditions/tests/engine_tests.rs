use chrono::{DateTime, Duration, TimeZone, Utc};

use conditions::{
    Bar, BarUpdate, Calculate, ChartOverlay, ConditionsIndicator, Const, IndicatorConfig,
    MarketDataEvent, MarketDataType, RangePosition, SeriesSet, State, Timeframe, TlineBias,
    TrendStatus, Verdict, WarmUp,
};

fn at(day: i64, minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap() + Duration::days(day) + Duration::minutes(minutes)
}

fn bar(datetime: DateTime<Utc>, timeframe: Timeframe, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        symbol: "ES".to_string(),
        timeframe,
        datetime,
        open_price: close,
        high_price: high,
        low_price: low,
        close_price: close,
        volume: 1.0,
    }
}

fn config() -> IndicatorConfig {
    IndicatorConfig {
        lookback_period: 2,
        ma_period: 2,
        instrument: "ES".to_string(),
        ..IndicatorConfig::default()
    }
}

fn loaded(config: IndicatorConfig) -> (ConditionsIndicator, SeriesSet) {
    let mut series = SeriesSet::new(config.primary_timeframe);
    let mut indicator = ConditionsIndicator::new(config).expect("indicator");
    for state in [State::SetDefaults, State::Configure, State::DataLoaded] {
        indicator.on_state_change(state, &mut series).expect("state change");
    }
    (indicator, series)
}

#[test]
fn set_defaults_declares_properties() {
    let (indicator, series) = loaded(config());
    let props = indicator.properties();

    assert_eq!(props.name, "TDGConditions");
    assert_eq!(props.calculate, Calculate::OnEachTick);
    assert!(props.is_overlay);
    assert!(props.is_suspended_while_inactive);
    assert_eq!(indicator.state(), Some(State::DataLoaded));
    assert_eq!(series.len(), 2);
    assert_eq!(
        series.daily().map(|x| x.timeframe()),
        Some(Timeframe::D1)
    );
}

#[test]
fn lifecycle_must_run_in_order() {
    let mut series = SeriesSet::new(Timeframe::M5);
    let mut indicator = ConditionsIndicator::new(config()).expect("indicator");

    assert!(indicator.on_state_change(State::Configure, &mut series).is_err());
    indicator
        .on_state_change(State::SetDefaults, &mut series)
        .expect("defaults");
    assert!(indicator.on_state_change(State::DataLoaded, &mut series).is_err());
    assert!(indicator.on_state_change(State::SetDefaults, &mut series).is_err());

    let mut chart = ChartOverlay::new();
    assert!(indicator.on_bar_update(&series, &mut chart).is_err());
}

#[test]
fn daily_series_must_land_at_index_one() {
    let mut series = SeriesSet::new(Timeframe::M5);
    series.add_data_series(Timeframe::H1);
    let mut indicator = ConditionsIndicator::new(config()).expect("indicator");
    indicator
        .on_state_change(State::SetDefaults, &mut series)
        .expect("defaults");

    assert!(indicator.on_state_change(State::Configure, &mut series).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let config = IndicatorConfig {
        lookback_period: 0,
        ..IndicatorConfig::default()
    };
    assert!(ConditionsIndicator::new(config).is_err());
}

#[test]
fn only_last_ticks_move_price() {
    let (mut indicator, _series) = loaded(config());
    let mut bid = MarketDataEvent::last(at(0, 0), 95.0, 1.0);
    bid.market_data_type = MarketDataType::Bid;

    indicator.on_market_data(&bid);
    assert_eq!(indicator.last_price(), 0.0);

    indicator.on_market_data(&MarketDataEvent::last(at(0, 1), 96.25, 1.0));
    assert_eq!(indicator.last_price(), 96.25);
}

#[test]
fn warm_up_skips_drawing() {
    let (mut indicator, mut series) = loaded(config());
    let mut chart = ChartOverlay::new();

    series
        .push_bar(Const::DAILY_SERIES, bar(at(0, 0), Timeframe::D1, 110.0, 100.0, 105.0))
        .expect("push");
    let update = indicator.on_bar_update(&series, &mut chart).expect("update");

    assert_eq!(
        update,
        BarUpdate::WarmingUp(WarmUp::DailyBelowLookback { have: 1, need: 2 })
    );
    assert!(chart.is_empty());
    assert_eq!(indicator.snapshot().range_position, None);
}

#[test]
fn full_cycle_draws_status_overlay() {
    let (mut indicator, mut series) = loaded(config());
    let mut chart = ChartOverlay::new();

    series
        .push_bar(Const::DAILY_SERIES, bar(at(0, 0), Timeframe::D1, 110.0, 100.0, 105.0))
        .expect("push");
    series.push_primary(bar(at(1, 570), Timeframe::M5, 106.0, 104.0, 105.0));
    indicator.on_market_data(&MarketDataEvent::last(at(1, 575), 110.0, 1.0));
    series.push_primary(bar(at(1, 575), Timeframe::M5, 110.0, 103.0, 110.0));

    let update = indicator.on_bar_update(&series, &mut chart).expect("update");
    let BarUpdate::Drawn {
        snapshot,
        verdict,
        text,
    } = update
    else {
        panic!("expected drawn overlay");
    };

    assert_eq!(snapshot.range_position, Some(RangePosition::Inside));
    assert_eq!(snapshot.trend_status, Some(TrendStatus::Neutral));
    assert_eq!(snapshot.tline_bias, Some(TlineBias::Bullish));
    assert_eq!(verdict, Verdict::ChoppyMarket);
    assert_eq!(chart.get("Status").map(|x| x.text.clone()), Some(text));
    assert_eq!(indicator.snapshot(), &snapshot);
}

#[test]
fn terminated_indicator_rejects_updates() {
    let (mut indicator, mut series) = loaded(config());
    indicator
        .on_state_change(State::Terminated, &mut series)
        .expect("terminate");

    let mut chart = ChartOverlay::new();
    assert!(indicator.on_bar_update(&series, &mut chart).is_err());
}

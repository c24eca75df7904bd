use chrono::{DateTime, Duration, TimeZone, Utc};

use conditions::{
    Atr, Bar, Const, Ema, Indicator, IndicatorManager, MarketView, SeriesSet, SeriesView,
    Timeframe,
};

fn at(day: i64, minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap() + Duration::days(day) + Duration::minutes(minutes)
}

fn bar(datetime: DateTime<Utc>, timeframe: Timeframe, high: f64, low: f64, close: f64) -> Bar {
    Bar {
        symbol: "CL".to_string(),
        timeframe,
        datetime,
        open_price: close,
        high_price: high,
        low_price: low,
        close_price: close,
        volume: 10.0,
    }
}

fn atr_bars() -> Vec<Bar> {
    vec![
        bar(at(0, 0), Timeframe::D1, 10.0, 8.0, 9.0),
        bar(at(1, 0), Timeframe::D1, 11.0, 9.0, 10.0),
        bar(at(2, 0), Timeframe::D1, 14.0, 10.0, 13.0),
        bar(at(3, 0), Timeframe::D1, 13.0, 12.0, 12.0),
    ]
}

#[test]
fn atr_averages_during_warm_up_then_smooths() {
    let mut atr = Atr::new(3);
    let values = atr_bars()
        .iter()
        .map(|x| atr.update(x).expect("atr value"))
        .collect::<Vec<_>>();

    assert!((values[0] - 2.0).abs() < 1e-12);
    assert!((values[1] - 2.0).abs() < 1e-12);
    assert!((values[2] - 8.0 / 3.0).abs() < 1e-12);
    assert!((values[3] - 19.0 / 9.0).abs() < 1e-12);
}

#[test]
fn atr_revise_recomputes_developing_bar() {
    let bars = atr_bars();
    let mut atr = Atr::new(3);
    for bar in &bars {
        atr.update(bar);
    }

    let mut revised = bars[3].clone();
    revised.high_price = 16.0;
    revised.close_price = 15.0;
    let value = atr.revise(&revised).expect("atr value");
    assert!((value - 28.0 / 9.0).abs() < 1e-12);

    let mut fresh = Atr::new(3);
    for bar in bars.iter().take(3) {
        fresh.update(bar);
    }
    assert_eq!(fresh.update(&revised), Some(value));
}

#[test]
fn ema_seeds_with_first_close_and_revises() {
    let mut ema = Ema::new(3);
    assert_eq!(ema.value(), None);
    assert_eq!(ema.update(&bar(at(0, 0), Timeframe::M5, 10.0, 10.0, 10.0)), Some(10.0));
    assert_eq!(ema.update(&bar(at(0, 5), Timeframe::M5, 12.0, 12.0, 12.0)), Some(11.0));
    assert_eq!(ema.revise(&bar(at(0, 5), Timeframe::M5, 14.0, 14.0, 14.0)), Some(12.0));
    assert_eq!(ema.name(), "ema_3");
    assert_eq!(ema.period(), 3);
}

#[test]
fn manager_ignores_duplicate_registration() {
    let bars = atr_bars();
    let mut manager = IndicatorManager::default();
    let name = manager.register(Box::new(Atr::new(3)), &bars[..3]);
    let again = manager.register(Box::new(Atr::new(3)), &bars);

    assert_eq!(name, "atr_3");
    assert_eq!(again, name);
    assert_eq!(manager.len(), 1);
    assert!((manager.value(&name).expect("value") - 8.0 / 3.0).abs() < 1e-12);

    let row = manager.update(&bars[3]);
    assert_eq!(row.len(), 1);
    assert_eq!(row.get(&name).copied().flatten(), manager.value(&name));
    assert_eq!(manager.period(&name), Some(3));
}

#[test]
fn added_series_gets_index_one() {
    let mut series = SeriesSet::new(Timeframe::M5);
    assert_eq!(series.add_data_series(Timeframe::D1), Const::DAILY_SERIES);
    assert_eq!(series.len(), 2);
    assert!(series.push_bar(2, bar(at(0, 0), Timeframe::D1, 1.0, 1.0, 1.0)).is_err());
    assert!(series.attach(5, Box::new(Ema::new(3))).is_err());
}

#[test]
fn attach_backfills_over_existing_history() {
    let mut series = SeriesSet::new(Timeframe::M5);
    series.add_data_series(Timeframe::D1);
    for bar in atr_bars().into_iter().take(3) {
        series.push_bar(Const::DAILY_SERIES, bar).expect("push");
    }

    let handle = series
        .attach(Const::DAILY_SERIES, Box::new(Atr::new(3)))
        .expect("attach");
    let daily = series.daily().expect("daily series");
    assert!((daily.indicators().value(&handle).expect("value") - 8.0 / 3.0).abs() < 1e-12);
}

#[test]
fn primary_bars_fold_into_developing_daily_bar() {
    let mut series = SeriesSet::new(Timeframe::M5);
    series.add_data_series(Timeframe::D1);
    let atr = series
        .attach(Const::DAILY_SERIES, Box::new(Atr::new(2)))
        .expect("attach atr");
    let ema = series
        .attach(Const::PRIMARY_SERIES, Box::new(Ema::new(3)))
        .expect("attach ema");

    series
        .push_bar(Const::DAILY_SERIES, bar(at(0, 0), Timeframe::D1, 110.0, 100.0, 105.0))
        .expect("push daily");
    series.push_primary(bar(at(1, 570), Timeframe::M5, 106.0, 104.0, 105.0));
    series.push_primary(bar(at(1, 575), Timeframe::M5, 108.0, 101.0, 107.0));

    let view = SeriesView::new(&series, &atr, &ema);
    assert_eq!(view.bar_count(Const::DAILY_SERIES), 2);
    assert_eq!(view.bar_count(Const::PRIMARY_SERIES), 2);
    assert_eq!(view.bar_count(9), 0);
    assert_eq!(view.daily_high(0), Some(108.0));
    assert_eq!(view.daily_low(0), Some(101.0));
    assert_eq!(view.daily_high(1), Some(110.0));
    assert_eq!(view.daily_low(1), Some(100.0));
    assert_eq!(view.daily_high(2), None);
    assert!((view.smoothed_volatility().expect("atr") - 8.5).abs() < 1e-12);
    assert_eq!(view.moving_average(), Some(106.0));

    let today = series.daily().and_then(|x| x.get(0)).expect("today");
    assert_eq!(today.timeframe, Timeframe::D1);
    assert_eq!(today.close_price, 107.0);
    assert_eq!(today.volume, 20.0);

    series.push_primary(bar(at(2, 570), Timeframe::M5, 109.0, 107.0, 108.0));
    assert_eq!(series.count(Const::DAILY_SERIES), 3);
}

#[test]
fn completed_daily_bar_replaces_developing_bar_of_same_date() {
    let mut series = SeriesSet::new(Timeframe::M5);
    series.add_data_series(Timeframe::D1);
    let atr = series
        .attach(Const::DAILY_SERIES, Box::new(Atr::new(2)))
        .expect("attach atr");

    series
        .push_bar(Const::DAILY_SERIES, bar(at(0, 0), Timeframe::D1, 110.0, 100.0, 105.0))
        .expect("push daily");
    series.push_primary(bar(at(1, 840), Timeframe::M5, 106.0, 104.0, 105.0));
    series
        .push_bar(Const::DAILY_SERIES, bar(at(1, 1320), Timeframe::D1, 112.0, 98.0, 111.0))
        .expect("push session close");

    let daily = series.daily().expect("daily series");
    assert_eq!(daily.count(), 2);
    assert_eq!(daily.high(0), Some(112.0));
    assert_eq!(daily.low(0), Some(98.0));
    assert_eq!(daily.high(1), Some(110.0));
    assert_eq!(daily.get(0).map(Bar::session_date), Some(at(1, 0).date_naive()));
    assert_eq!(daily.get(0).map(|x| x.close_price), Some(111.0));
    // true range 14 against prior close 105: (10 + 14) / 2
    assert!((daily.indicators().value(&atr).expect("atr") - 12.0).abs() < 1e-12);

    series
        .push_bar(Const::DAILY_SERIES, bar(at(0, 0), Timeframe::D1, 500.0, 1.0, 2.0))
        .expect("push stale");
    let daily = series.daily().expect("daily series");
    assert_eq!(daily.count(), 2);
    assert_eq!(daily.high(1), Some(110.0));
}

#[test]
fn stale_primary_bar_is_not_folded() {
    let mut series = SeriesSet::new(Timeframe::M5);
    series.add_data_series(Timeframe::D1);
    series.push_primary(bar(at(2, 570), Timeframe::M5, 109.0, 107.0, 108.0));
    series.push_primary(bar(at(1, 570), Timeframe::M5, 150.0, 90.0, 120.0));

    let daily = series.daily().expect("daily series");
    assert_eq!(daily.count(), 1);
    assert_eq!(daily.high(0), Some(109.0));
    assert_eq!(series.primary().count(), 2);
}

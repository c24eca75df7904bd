use crate::constant::{Const, TrendStatus, Verdict};

pub fn classify(volatility_percent: f64, trend: TrendStatus) -> Verdict {
    if volatility_percent < Const::VOLATILITY_THRESHOLD {
        Verdict::LowVolatility
    } else if trend != TrendStatus::Neutral {
        Verdict::GoodConditions
    } else {
        Verdict::ChoppyMarket
    }
}

use crate::bar::Bar;

use super::core::Indicator;

/// Average true range. Bars before `period` is reached are averaged over the
/// bars seen so far, then Wilder smoothing takes over.
#[derive(Debug, Clone)]
pub struct Atr {
    name: String,
    period: usize,
    value: Option<f64>,
    prev_close: Option<f64>,
    count: usize,
    base_value: Option<f64>,
    base_prev_close: Option<f64>,
    base_count: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            name: format!("atr_{period}"),
            period,
            value: None,
            prev_close: None,
            count: 0,
            base_value: None,
            base_prev_close: None,
            base_count: 0,
        }
    }

    fn true_range(&self, high: f64, low: f64, prev_close: Option<f64>) -> f64 {
        if let Some(prev_close) = prev_close {
            (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs())
        } else {
            high - low
        }
    }

    fn apply(&mut self, bar: &Bar) -> Option<f64> {
        let tr = self.true_range(bar.high_price, bar.low_price, self.base_prev_close);
        let seen = self.base_count as f64;
        self.value = Some(match self.base_value {
            None => tr,
            Some(prev) if self.base_count < self.period => (prev * seen + tr) / (seen + 1.0),
            Some(prev) => (prev * (self.period as f64 - 1.0) + tr) / self.period as f64,
        });
        self.prev_close = Some(bar.close_price);
        self.count = self.base_count + 1;
        self.value
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn reset(&mut self) {
        self.value = None;
        self.prev_close = None;
        self.count = 0;
        self.base_value = None;
        self.base_prev_close = None;
        self.base_count = 0;
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.base_value = self.value;
        self.base_prev_close = self.prev_close;
        self.base_count = self.count;
        self.apply(bar)
    }

    fn revise(&mut self, bar: &Bar) -> Option<f64> {
        if self.count == 0 {
            return self.update(bar);
        }
        self.apply(bar)
    }
}

use crate::bar::Bar;

use super::core::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    name: String,
    period: usize,
    alpha: f64,
    value: Option<f64>,
    base_value: Option<f64>,
    seeded: bool,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            name: format!("ema_{period}"),
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            value: None,
            base_value: None,
            seeded: false,
        }
    }

    fn apply(&mut self, price: f64) -> Option<f64> {
        self.value = Some(match self.base_value {
            None => price,
            Some(prev) => prev + self.alpha * (price - prev),
        });
        self.seeded = true;
        self.value
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> usize {
        self.period
    }

    fn reset(&mut self) {
        self.value = None;
        self.base_value = None;
        self.seeded = false;
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.base_value = self.value;
        self.apply(bar.close_price)
    }

    fn revise(&mut self, bar: &Bar) -> Option<f64> {
        if !self.seeded {
            return self.update(bar);
        }
        self.apply(bar.close_price)
    }
}

use std::collections::HashMap;

use crate::bar::Bar;

use super::core::Indicator;

#[derive(Default)]
pub struct IndicatorManager {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorManager {
    /// Registers an indicator and backfills it over `history`. Returns the
    /// indicator's name; a second registration under the same name is ignored.
    pub fn register(&mut self, mut indicator: Box<dyn Indicator>, history: &[Bar]) -> String {
        let name = indicator.name().to_string();
        if self.indicators.iter().any(|x| x.name() == name) {
            return name;
        }
        indicator.backfill(history, 0);
        self.indicators.push(indicator);
        name
    }

    pub fn update(&mut self, bar: &Bar) -> HashMap<String, Option<f64>> {
        self.indicators
            .iter_mut()
            .map(|x| {
                let value = x.update(bar);
                (x.name().to_string(), value)
            })
            .collect()
    }

    pub fn revise(&mut self, bar: &Bar) -> HashMap<String, Option<f64>> {
        self.indicators
            .iter_mut()
            .map(|x| {
                let value = x.revise(bar);
                (x.name().to_string(), value)
            })
            .collect()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.indicators
            .iter()
            .find(|x| x.name() == name)
            .and_then(|x| x.value())
    }

    pub fn period(&self, name: &str) -> Option<usize> {
        self.indicators
            .iter()
            .find(|x| x.name() == name)
            .map(|x| x.period())
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

use crate::bar::Bar;

/// Incremental calculator attached to one bar series.
///
/// `update` is called once per new bar; `revise` is called when the most recent
/// bar changed in place (a developing daily bar) and must recompute from the
/// state that preceded that bar.
pub trait Indicator: Send {
    fn name(&self) -> &str;
    fn period(&self) -> usize;
    fn reset(&mut self);
    fn value(&self) -> Option<f64>;
    fn update(&mut self, bar: &Bar) -> Option<f64>;
    fn revise(&mut self, bar: &Bar) -> Option<f64>;

    fn backfill(&mut self, bars: &[Bar], start_index: usize) -> Vec<Option<f64>> {
        if start_index == 0 {
            self.reset();
        }
        bars.iter().skip(start_index).map(|bar| self.update(bar)).collect()
    }
}

pub mod bar;
pub mod classifier;
pub mod config;
pub mod constant;
pub mod engine;
pub mod evaluator;
pub mod indicator;
pub mod loader;
pub mod logging;
pub mod presentation;
pub mod report;
pub mod series;
pub mod tick;
pub mod utils;
pub mod view;

pub use bar::Bar;
pub use classifier::classify;
pub use config::{ConfigLoader, IndicatorConfig};
pub use constant::{
    ConditionsError, Const, RangePosition, TextPosition, Timeframe, TlineBias, TrendStatus,
    Verdict,
};
pub use engine::{BarUpdate, Calculate, ConditionsIndicator, IndicatorProperties, State};
pub use evaluator::{ConditionEvaluator, ConditionSnapshot, WarmUp};
pub use indicator::{Atr, Ema, Indicator, IndicatorManager};
pub use loader::{load_bars, load_ticks, parse_datetime};
pub use logging::init_logging;
pub use presentation::{ChartOverlay, DrawSurface, TextObject, format_overlay, render};
pub use report::{ConditionHistory, ConditionRecord};
pub use series::{Series, SeriesSet};
pub use tick::{LastPriceTracker, MarketDataEvent, MarketDataType};
pub use view::{MarketView, SeriesView, StaticView};

pub mod core;
pub mod ema;
pub mod atr;
pub mod manager;

pub use atr::Atr;
pub use self::core::Indicator;
pub use ema::Ema;
pub use manager::IndicatorManager;

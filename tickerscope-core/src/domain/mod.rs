//! Domain types for TickerScope

pub mod bar;
pub mod series;

pub use bar::PriceBar;
pub use series::{DatedValue, PriceSeries, SeriesError};

//! Stats module - Marker sizing and outlier ranking

mod calculator;

pub use calculator::{StatsCalculator, OUTLIER_LABELS};

//! Core data structures: the wide dataset and the extracted monthly series.

mod dataset;
mod time_series;

pub use dataset::{normalize_key, Dataset, MatchPolicy, DEFAULT_KEY_COLUMN};
pub use time_series::MonthlySeries;

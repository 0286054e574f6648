//! Seasonal-trend decomposition and strength metrics.
//!
//! - STL: Seasonal-Trend decomposition using LOESS, fixed annual period
//! - Strength: trend/seasonal strength from component variances

mod stl;
mod strength;

pub use stl::{STLResult, SEASONAL_PERIOD, STL};
pub use strength::{strength, Strengths, VARIANCE_EPSILON};

//! # munistl
//!
//! Seasonal-trend decomposition of municipal monthly series stored in wide
//! tables (one row per municipality, one column per month).
//!
//! The pipeline resolves localized period column labels such as `2008/Jan`
//! or `Dez/2009` to calendar months, extracts the row of one municipality
//! inside a month window, decomposes it with STL (annual period) and reports
//! trend and seasonal strength.
//!
//! ```
//! use munistl::core::Dataset;
//! use munistl::config::AnalysisConfig;
//! use munistl::pipeline::{decompose, DecompositionRequest};
//!
//! let months = ["Jan", "Fev", "Mar", "Abr", "Mai", "Jun",
//!               "Jul", "Ago", "Set", "Out", "Nov", "Dez"];
//! let mut headers = vec!["Município".to_string()];
//! let mut row = vec!["110150 SERINGUEIRAS".to_string()];
//! for (i, label) in (2008..=2009)
//!     .flat_map(|y| months.iter().map(move |m| format!("{}/{}", y, m)))
//!     .enumerate()
//! {
//!     headers.push(label);
//!     let x = i as f64;
//!     row.push(format!("{}", 10.0 + 0.2 * x + 3.0 * (x * std::f64::consts::PI / 6.0).sin()));
//! }
//! let dataset = Dataset::new(headers, vec![row]).unwrap();
//!
//! let request = DecompositionRequest::parse("110150 seringueiras", "2008-01", "2009-12").unwrap();
//! let report = decompose(&dataset, &request, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.observed.len(), 24);
//! assert!((0.0..=1.0).contains(&report.seasonal_strength));
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod calendar;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod seasonality;

pub use error::{DecompositionError, ErrorKind, Result};

pub mod prelude {
    pub use crate::calendar::{DateWindow, Locale};
    pub use crate::config::AnalysisConfig;
    pub use crate::core::{Dataset, MatchPolicy, MonthlySeries};
    pub use crate::error::{DecompositionError, ErrorKind, Result};
    pub use crate::pipeline::{decompose, DecompositionRequest};
    pub use crate::report::DecompositionReport;
    pub use crate::seasonality::{STLResult, Strengths, STL};
}

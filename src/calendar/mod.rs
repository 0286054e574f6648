//! Localized calendar handling for period columns.
//!
//! This module maps wide-table column headers such as `2008/Jan` or
//! `Dez/2009` onto calendar months and filters them to a requested window:
//! - `month`: localized abbreviation tables
//! - `label`: period label parsing
//! - `window`: inclusive month window
//! - `resolver`: header-to-window resolution

mod label;
mod month;
mod resolver;
mod window;

pub use label::{is_period_label, parse_period_label, PERIOD_SEPARATOR};
pub use month::Locale;
pub use resolver::{resolve_columns, ResolvedColumn};
pub use window::{parse_bound, DateWindow};

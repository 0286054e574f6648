//! Inclusive month window.

use crate::error::{DecompositionError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Inclusive `[start, end]` range of calendar months.
///
/// Both bounds are normalized to the first day of their month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window from two dates. `start > end` is allowed and simply
    /// contains nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: first_of_month(start),
            end: first_of_month(end),
        }
    }

    /// Parse a window from two `YYYY-MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_bound(start)?, parse_bound(end)?))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the month of `date` lies inside the window, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let month = first_of_month(date);
        self.start <= month && month <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.format("%Y-%m"), self.end.format("%Y-%m"))
    }
}

/// Parse one window bound: `YYYY-MM`, or `YYYY-MM-DD` truncated to its month.
pub fn parse_bound(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d"))
        .map(first_of_month)
        .map_err(|_| DecompositionError::WindowParse {
            input: input.to_string(),
        })
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

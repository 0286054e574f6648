//! Monthly time series extracted from one dataset row.

use crate::error::{DecompositionError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// An ordered sequence of `(month, value)` observations.
///
/// Months are stored as the first day of the month and are strictly
/// increasing. Gaps between months are allowed here; decomposition requires
/// [`MonthlySeries::ensure_contiguous`] to pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    months: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Create a series from aligned months and values.
    pub fn new(months: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if months.len() != values.len() {
            return Err(DecompositionError::DimensionMismatch {
                expected: months.len(),
                got: values.len(),
            });
        }

        let months: Vec<NaiveDate> = months
            .into_iter()
            .map(|m| m.with_day(1).unwrap_or(m))
            .collect();

        // Validate months are strictly increasing
        for i in 1..months.len() {
            if months[i] <= months[i - 1] {
                return Err(DecompositionError::TimestampOrder(format!(
                    "months must be strictly increasing: {} follows {}",
                    months[i].format("%Y-%m"),
                    months[i - 1].format("%Y-%m")
                )));
            }
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(DecompositionError::ComputationError(format!(
                "non-finite value at {}",
                months[pos].format("%Y-%m")
            )));
        }

        Ok(Self { months, values })
    }

    /// Create a series on a regular monthly grid starting at `start`.
    pub fn regular(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let start = start.with_day(1).unwrap_or(start);
        let months = (0..values.len())
            .map(|i| {
                start.checked_add_months(Months::new(i as u32)).ok_or_else(|| {
                    DecompositionError::TimestampOrder("month index overflow".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(months, values)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consecutive pairs of months that are more than one month apart.
    pub fn gaps(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.months
            .windows(2)
            .filter(|w| w[0].checked_add_months(Months::new(1)) != Some(w[1]))
            .map(|w| (w[0], w[1]))
            .collect()
    }

    /// Number of calendar months absent between the first and last month.
    pub fn missing_months(&self) -> usize {
        self.months
            .windows(2)
            .map(|w| month_ordinal(w[1]) - month_ordinal(w[0]) - 1)
            .sum::<i64>() as usize
    }

    /// Fail with [`DecompositionError::MissingMonths`] unless the months form
    /// an unbroken monthly grid.
    pub fn ensure_contiguous(&self) -> Result<()> {
        match self.gaps().first() {
            None => Ok(()),
            Some((after, next)) => Err(DecompositionError::MissingMonths {
                after: after.format("%Y-%m").to_string(),
                next: next.format("%Y-%m").to_string(),
                missing: self.missing_months(),
            }),
        }
    }

    /// Whether every month directly follows the previous one.
    pub fn is_contiguous(&self) -> bool {
        self.gaps().is_empty()
    }
}

fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

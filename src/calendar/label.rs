//! Period column label parsing.
//!
//! Period columns are labelled with a localized month abbreviation and a
//! year separated by `/`. Three layouts are recognised:
//! - `YYYY/Mon` (e.g. `2008/Jan`)
//! - `Mon/YYYY` (e.g. `Jan/2008`)
//! - `DD/Mon/YYYY` (e.g. `01/Jan/2008`, the day is ignored)

use super::month::Locale;
use crate::error::{DecompositionError, Result};
use chrono::NaiveDate;

/// Character that separates the parts of a period label.
pub const PERIOD_SEPARATOR: char = '/';

/// Whether a column header looks like a period label rather than metadata.
pub fn is_period_label(label: &str) -> bool {
    label.contains(PERIOD_SEPARATOR)
}

/// Resolve a period label to the first day of the month it names.
pub fn parse_period_label(label: &str, locale: Locale) -> Result<NaiveDate> {
    let parts: Vec<&str> = label.split(PERIOD_SEPARATOR).map(str::trim).collect();

    let (month_part, year_part) = match parts.as_slice() {
        [first, second] if is_year(first) => (*second, *first),
        [first, second] => (*first, *second),
        [_day, month, year] => (*month, *year),
        _ => {
            return Err(label_error(
                label,
                format!(
                    "expected 2 or 3 parts separated by '{}', got {}",
                    PERIOD_SEPARATOR,
                    parts.len()
                ),
            ))
        }
    };

    if !is_year(year_part) {
        return Err(label_error(label, format!("invalid year {:?}", year_part)));
    }
    let year: i32 = year_part
        .parse()
        .map_err(|_| label_error(label, format!("invalid year {:?}", year_part)))?;

    let month = locale.month_number(month_part).ok_or_else(|| {
        label_error(
            label,
            format!("unknown month abbreviation {:?}", month_part),
        )
    })?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| label_error(label, "date out of range".to_string()))
}

fn is_year(part: &str) -> bool {
    part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit())
}

fn label_error(label: &str, reason: String) -> DecompositionError {
    DecompositionError::LabelParse {
        label: label.to_string(),
        reason,
    }
}

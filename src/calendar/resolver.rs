//! Column calendar resolution: header labels to in-window months.

use super::label::{is_period_label, parse_period_label};
use super::month::Locale;
use super::window::DateWindow;
use crate::error::{DecompositionError, Result};
use chrono::NaiveDate;

/// A period column that falls inside the requested window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Position of the column in the header.
    pub index: usize,
    /// Original header label.
    pub label: String,
    /// First day of the month the label names.
    pub month: NaiveDate,
}

/// Resolve the period columns of a header that fall inside `window`.
///
/// Non-period headers (no `/`) are ignored. Every period header must parse;
/// the first one that doesn't aborts resolution. The result keeps header
/// order and is never empty.
pub fn resolve_columns<S: AsRef<str>>(
    headers: &[S],
    window: &DateWindow,
    locale: Locale,
) -> Result<Vec<ResolvedColumn>> {
    let mut resolved = Vec::new();
    let mut candidates = 0usize;

    for (index, header) in headers.iter().enumerate() {
        let label = header.as_ref();
        if !is_period_label(label) {
            continue;
        }
        candidates += 1;

        let month = parse_period_label(label, locale)?;
        if window.contains(month) {
            resolved.push(ResolvedColumn {
                index,
                label: label.to_string(),
                month,
            });
        }
    }

    tracing::debug!(
        candidates,
        in_window = resolved.len(),
        window = %window,
        "resolved period columns"
    );

    if resolved.is_empty() {
        return Err(DecompositionError::RangeEmpty {
            start: window.start().format("%Y-%m").to_string(),
            end: window.end().format("%Y-%m").to_string(),
        });
    }

    Ok(resolved)
}

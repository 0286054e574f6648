//! End-to-end extraction and decomposition of one row.
//!
//! The pipeline runs in a fixed order and stops at the first failure:
//! window resolution, row selection, value coercion, series construction,
//! contiguity check, STL, strengths.

use crate::calendar::{resolve_columns, DateWindow, ResolvedColumn};
use crate::config::{AnalysisConfig, DecimalSeparator};
use crate::core::{Dataset, MonthlySeries};
use crate::error::{DecompositionError, Result};
use crate::report::DecompositionReport;

/// Which row and which months to analyse.
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionRequest {
    pub key: String,
    pub window: DateWindow,
}

impl DecompositionRequest {
    pub fn new(key: impl Into<String>, window: DateWindow) -> Self {
        Self {
            key: key.into(),
            window,
        }
    }

    /// Build a request from a key and two `YYYY-MM` bounds.
    pub fn parse(key: impl Into<String>, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(key, DateWindow::parse(start, end)?))
    }
}

/// A selected row's values at the resolved columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSeries {
    /// Index of the selected row.
    pub row: usize,
    /// Identity value of the selected row, trimmed.
    pub key: String,
    pub series: MonthlySeries,
}

/// Coerce one cell to a number.
///
/// The placeholder (and an empty cell) becomes `0.0`. Anything else must be
/// a finite number in the configured decimal notation.
pub fn coerce_value(raw: &str, column: &str, config: &AnalysisConfig) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == config.placeholder() {
        return Ok(0.0);
    }

    let parsed = match config.decimal_separator() {
        DecimalSeparator::Point => trimmed.parse::<f64>().ok(),
        DecimalSeparator::Comma => {
            from_decimal_comma(trimmed).and_then(|text| text.parse::<f64>().ok())
        }
    };

    match parsed {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(DecompositionError::ValueParse {
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Rewrite `1.234,5` as `1234.5`.
///
/// A `.` is accepted only as a thousands separator: every group after it
/// must have exactly three digits, so `12.5` is refused rather than read
/// as `125`.
fn from_decimal_comma(text: &str) -> Option<String> {
    let (whole, fraction) = match text.split_once(',') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    if fraction.is_some_and(|f| f.contains(['.', ','])) {
        return None;
    }

    let mut groups = whole.split('.');
    let lead = groups.next()?;
    let mut digits = lead.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if grouped {
        let lead_digits = lead.trim_start_matches(['-', '+']);
        if lead_digits.is_empty() || lead_digits.len() > 3 {
            return None;
        }
    }

    Some(match fraction {
        Some(fraction) => format!("{}.{}", digits, fraction),
        None => digits,
    })
}

/// Select the row matching `key` and read its values at `columns`.
///
/// Each value keeps the month resolved from its own column label.
pub fn extract_series(
    dataset: &Dataset,
    key: &str,
    columns: &[ResolvedColumn],
    config: &AnalysisConfig,
) -> Result<ExtractedSeries> {
    let row_index = dataset.select_row(key, config.match_policy())?;
    let row = dataset
        .row(row_index)
        .ok_or_else(|| DecompositionError::InvalidDataset(format!("row {} not found", row_index)))?;

    let values = columns
        .iter()
        .map(|col| {
            let cell = row.get(col.index).ok_or_else(|| {
                DecompositionError::InvalidDataset(format!("column {} out of range", col.index))
            })?;
            coerce_value(cell, &col.label, config)
        })
        .collect::<Result<Vec<f64>>>()?;

    let months = columns.iter().map(|c| c.month).collect();
    let series = MonthlySeries::new(months, values)?;

    let key = row[dataset.key_column()].trim().to_string();
    tracing::debug!(row = row_index, key = %key, observations = series.len(), "extracted series");

    Ok(ExtractedSeries {
        row: row_index,
        key,
        series,
    })
}

/// Run the whole pipeline for one request.
pub fn decompose(
    dataset: &Dataset,
    request: &DecompositionRequest,
    config: &AnalysisConfig,
) -> Result<DecompositionReport> {
    let columns = resolve_columns(dataset.headers(), &request.window, config.locale())?;
    let extracted = extract_series(dataset, &request.key, &columns, config)?;

    // STL indexes observations by position
    if let Err(err) = extracted.series.ensure_contiguous() {
        tracing::warn!(key = %extracted.key, error = %err, "refusing gapped series");
        return Err(err);
    }

    let result = config.stl().decompose(extracted.series.values())?;
    let strengths = result.strengths()?;

    tracing::info!(
        key = %extracted.key,
        observations = extracted.series.len(),
        trend_strength = strengths.trend,
        seasonal_strength = strengths.seasonal,
        "decomposition complete"
    );

    Ok(DecompositionReport::new(
        dataset.key_column_name(),
        extracted.key,
        request.window,
        &extracted.series,
        result,
        strengths,
    ))
}

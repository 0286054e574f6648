//! Plain-data decomposition output and its renderers.

use crate::calendar::DateWindow;
use crate::core::{Dataset, MonthlySeries};
use crate::error::{DecompositionError, Result};
use crate::seasonality::{STLResult, Strengths};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt::Write as _;

/// Everything a presentation layer needs from one decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionReport {
    /// Header of the identity column.
    pub key_column: String,
    /// Identity value of the analysed row.
    pub key: String,
    #[serde(serialize_with = "serialize_month")]
    pub window_start: NaiveDate,
    #[serde(serialize_with = "serialize_month")]
    pub window_end: NaiveDate,
    pub trend_strength: f64,
    pub seasonal_strength: f64,
    #[serde(serialize_with = "serialize_months")]
    pub months: Vec<NaiveDate>,
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

impl DecompositionReport {
    pub fn new(
        key_column: &str,
        key: String,
        window: DateWindow,
        series: &MonthlySeries,
        result: STLResult,
        strengths: Strengths,
    ) -> Self {
        Self {
            key_column: key_column.to_string(),
            key,
            window_start: window.start(),
            window_end: window.end(),
            trend_strength: strengths.trend,
            seasonal_strength: strengths.seasonal,
            months: series.months().to_vec(),
            observed: result.observed,
            trend: result.trend,
            seasonal: result.seasonal,
            residual: result.residual,
        }
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

fn serialize_month<S: Serializer>(
    month: &NaiveDate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&month.format("%Y-%m"))
}

fn serialize_months<S: Serializer>(
    months: &[NaiveDate],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(months.iter().map(|m| m.format("%Y-%m").to_string()))
}

/// Human-readable summary: strengths followed by a component table.
pub fn render_text(report: &DecompositionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", report.key_column, report.key);
    let _ = writeln!(
        out,
        "Window: {}..{} ({} months)",
        report.window_start.format("%Y-%m"),
        report.window_end.format("%Y-%m"),
        report.len()
    );
    let _ = writeln!(out, "Trend strength (F_T): {:.3}", report.trend_strength);
    let _ = writeln!(out, "Seasonal strength (F_S): {:.3}", report.seasonal_strength);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:>14} {:>14} {:>14} {:>14}",
        "month", "observed", "trend", "seasonal", "residual"
    );
    for i in 0..report.len() {
        let _ = writeln!(
            out,
            "{:<8} {:>14.3} {:>14.3} {:>14.3} {:>14.3}",
            report.months[i].format("%Y-%m"),
            report.observed[i],
            report.trend[i],
            report.seasonal[i],
            report.residual[i]
        );
    }
    out
}

/// Pretty-printed JSON document.
pub fn render_json(report: &DecompositionReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| DecompositionError::Serialization(e.to_string()))
}

/// One CSV line per month: `month,observed,trend,seasonal,residual`.
pub fn render_csv(report: &DecompositionReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["month", "observed", "trend", "seasonal", "residual"])?;
    for i in 0..report.len() {
        wtr.write_record([
            report.months[i].format("%Y-%m").to_string(),
            report.observed[i].to_string(),
            report.trend[i].to_string(),
            report.seasonal[i].to_string(),
            report.residual[i].to_string(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| DecompositionError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DecompositionError::Serialization(e.to_string()))
}

/// The header and the first rows of a dataset, written back in its own
/// delimiter with CSV quoting.
pub fn render_preview(dataset: &Dataset, n: usize, delimiter: u8) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(vec![]);
    wtr.write_record(dataset.headers())?;
    for row in dataset.preview(n) {
        wtr.write_record(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| DecompositionError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DecompositionError::Serialization(e.to_string()))
}

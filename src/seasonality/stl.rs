//! STL (Seasonal-Trend decomposition using LOESS) implementation.
//!
//! STL decomposes a monthly series into three additive components:
//! - Trend: The underlying long-term pattern
//! - Seasonal: The repeating annual pattern
//! - Residual: What is left after removing trend and seasonal
//!
//! The procedure follows Cleveland et al. (1990): an inner loop alternating
//! cycle-subseries smoothing, low-pass filtering and trend smoothing, and an
//! optional outer loop computing bisquare robustness weights.

use super::strength::{strength, Strengths};
use crate::error::{DecompositionError, Result};

/// Seasonal period of monthly data with an annual cycle.
pub const SEASONAL_PERIOD: usize = 12;

/// Result of STL decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct STLResult {
    /// The input series.
    pub observed: Vec<f64>,
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Residual component, `observed - trend - seasonal`.
    pub residual: Vec<f64>,
}

impl STLResult {
    /// Trend strength, `max(0, 1 - Var(R) / Var(T + R))`.
    pub fn trend_strength(&self) -> Result<f64> {
        strength(&self.trend, &self.residual, "trend")
    }

    /// Seasonal strength, `max(0, 1 - Var(R) / Var(S + R))`.
    pub fn seasonal_strength(&self) -> Result<f64> {
        strength(&self.seasonal, &self.residual, "seasonal")
    }

    /// Both strengths.
    pub fn strengths(&self) -> Result<Strengths> {
        Ok(Strengths {
            trend: self.trend_strength()?,
            seasonal: self.seasonal_strength()?,
        })
    }
}

/// STL decomposition configuration and algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct STL {
    /// Seasonal LOESS span (ns).
    seasonal_smoothness: usize,
    /// Trend LOESS span (nt).
    trend_smoothness: usize,
    /// Low-pass LOESS span (nl).
    low_pass_smoothness: usize,
    /// Number of inner iterations.
    inner_iterations: usize,
    /// Number of outer (robustness) iterations.
    outer_iterations: usize,
}

impl STL {
    /// Create a decomposer for monthly data with default smoothing.
    pub fn new() -> Self {
        let period = SEASONAL_PERIOD as f64;
        let ns = 7;
        let nt = (1.5 * period / (1.0 - 1.5 / ns as f64)).ceil() as usize;

        Self {
            seasonal_smoothness: ns,
            trend_smoothness: odd(nt),
            low_pass_smoothness: odd(SEASONAL_PERIOD),
            inner_iterations: 2,
            outer_iterations: 0,
        }
    }

    /// Set custom seasonal smoothness (ns parameter).
    pub fn with_seasonal_smoothness(mut self, ns: usize) -> Self {
        self.seasonal_smoothness = odd(ns.max(3));
        self
    }

    /// Set custom trend smoothness (nt parameter).
    pub fn with_trend_smoothness(mut self, nt: usize) -> Self {
        self.trend_smoothness = odd(nt.max(3));
        self
    }

    /// Set number of inner iterations.
    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n.max(1);
        self
    }

    /// Set number of outer (robustness) iterations. Zero disables robust fitting.
    pub fn with_outer_iterations(mut self, n: usize) -> Self {
        self.outer_iterations = n;
        self
    }

    /// Enable robust fitting with the customary iteration counts.
    pub fn robust(mut self) -> Self {
        self.inner_iterations = 5;
        self.outer_iterations = 15;
        self
    }

    pub fn seasonal_smoothness(&self) -> usize {
        self.seasonal_smoothness
    }

    pub fn trend_smoothness(&self) -> usize {
        self.trend_smoothness
    }

    pub fn is_robust(&self) -> bool {
        self.outer_iterations > 0
    }

    /// Decompose the series.
    ///
    /// Requires at least two full seasonal cycles.
    pub fn decompose(&self, series: &[f64]) -> Result<STLResult> {
        let n = series.len();
        let needed = 2 * SEASONAL_PERIOD;
        if n < needed {
            return Err(DecompositionError::InsufficientData { needed, got: n });
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(DecompositionError::ComputationError(
                "input contains non-finite values".to_string(),
            ));
        }

        let mut seasonal = vec![0.0; n];
        let mut trend = vec![0.0; n];
        let mut weights = vec![1.0; n];

        for outer in 0..=self.outer_iterations {
            self.inner_loop(series, &weights, &mut seasonal, &mut trend);

            if outer < self.outer_iterations {
                let residual = residual(series, &seasonal, &trend);
                weights = robustness_weights(&residual);
            }
        }

        let residual = residual(series, &seasonal, &trend);

        if trend
            .iter()
            .chain(seasonal.iter())
            .chain(residual.iter())
            .any(|v| !v.is_finite())
        {
            return Err(DecompositionError::ComputationError(
                "decomposition produced non-finite components".to_string(),
            ));
        }

        Ok(STLResult {
            observed: series.to_vec(),
            trend,
            seasonal,
            residual,
        })
    }

    fn inner_loop(
        &self,
        series: &[f64],
        weights: &[f64],
        seasonal: &mut [f64],
        trend: &mut Vec<f64>,
    ) {
        let n = series.len();
        let period = SEASONAL_PERIOD;

        for _ in 0..self.inner_iterations {
            // Step 1: Detrending
            let detrended: Vec<f64> = series.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();

            // Step 2: Cycle-subseries smoothing, extended one period each side
            let cycle = self.smooth_cycle_subseries(&detrended, weights);

            // Step 3: Low-pass filter of smoothed cycle-subseries
            let low_pass = self.low_pass_filter(&cycle);

            // Step 4: Detrending of smoothed cycle-subseries
            for i in 0..n {
                seasonal[i] = cycle[i + period] - low_pass[i];
            }

            // Step 5: Deseasonalizing
            let deseasonalized: Vec<f64> =
                series.iter().zip(seasonal.iter()).map(|(y, s)| y - s).collect();

            // Step 6: Trend smoothing
            *trend = loess_smooth(&deseasonalized, weights, self.trend_smoothness);
        }
    }

    /// Smooth each cycle-subseries and extrapolate one value before and after.
    ///
    /// Output has `n + 2 * period` values; index `i + period` lines up with
    /// input index `i`.
    fn smooth_cycle_subseries(&self, detrended: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = detrended.len();
        let period = SEASONAL_PERIOD;
        let mut cycle = vec![0.0; n + 2 * period];

        for pos in 0..period {
            let values: Vec<f64> = detrended.iter().skip(pos).step_by(period).copied().collect();
            let sub_weights: Vec<f64> = weights.iter().skip(pos).step_by(period).copied().collect();
            let m = values.len();

            for k in -1..=(m as isize) {
                let smoothed =
                    loess_point(&values, &sub_weights, self.seasonal_smoothness, k as f64)
                        .unwrap_or_else(|| values[k.clamp(0, m as isize - 1) as usize]);
                let idx = (pos as isize + (k + 1) * period as isize) as usize;
                cycle[idx] = smoothed;
            }
        }

        cycle
    }

    /// Low-pass filter: MA(period), MA(period), MA(3), then LOESS.
    fn low_pass_filter(&self, cycle: &[f64]) -> Vec<f64> {
        let period = SEASONAL_PERIOD;
        let ma1 = moving_average(cycle, period);
        let ma2 = moving_average(&ma1, period);
        let ma3 = moving_average(&ma2, 3);

        let weights = vec![1.0; ma3.len()];
        loess_smooth(&ma3, &weights, self.low_pass_smoothness)
    }
}

impl Default for STL {
    fn default() -> Self {
        Self::new()
    }
}

fn odd(n: usize) -> usize {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

fn residual(series: &[f64], seasonal: &[f64], trend: &[f64]) -> Vec<f64> {
    series
        .iter()
        .zip(seasonal.iter())
        .zip(trend.iter())
        .map(|((y, s), t)| y - s - t)
        .collect()
}

/// Moving average over full windows only; output has `len - window + 1` values.
fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    series
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// LOESS smoothing evaluated at every input position.
fn loess_smooth(values: &[f64], weights: &[f64], span: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| loess_point(values, weights, span, i as f64).unwrap_or(values[i]))
        .collect()
}

/// Local linear LOESS estimate at position `x` (positions are `0..len`).
///
/// Uses the `span` nearest points with tricube distance weights multiplied
/// by `weights`. Returns `None` when every neighbour has zero weight.
fn loess_point(values: &[f64], weights: &[f64], span: usize, x: f64) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let last = (n - 1) as f64;

    let (left, right, h) = if span >= n {
        // Widened by whole points only
        let h = x.max(last - x) + ((span - n) / 2) as f64;
        (0, n - 1, h)
    } else {
        let half = (span / 2) as isize;
        let left = (x.round() as isize - half).clamp(0, (n - span) as isize) as usize;
        let right = left + span - 1;
        let h = (x - left as f64).max(right as f64 - x);
        (left, right, h)
    };

    let upper = 0.999 * h;
    let lower = 0.001 * h;

    let mut local = vec![0.0; right - left + 1];
    let mut total = 0.0;
    for (slot, j) in local.iter_mut().zip(left..=right) {
        let r = (j as f64 - x).abs();
        if r <= upper {
            let tricube = if r <= lower {
                1.0
            } else {
                (1.0 - (r / h).powi(3)).powi(3)
            };
            *slot = tricube * weights[j];
            total += *slot;
        }
    }

    if total <= 0.0 {
        return None;
    }
    for w in local.iter_mut() {
        *w /= total;
    }

    // Degree-1 correction
    if h > 0.0 {
        let centre: f64 = local
            .iter()
            .zip(left..=right)
            .map(|(w, j)| w * j as f64)
            .sum();
        let spread: f64 = local
            .iter()
            .zip(left..=right)
            .map(|(w, j)| w * (j as f64 - centre).powi(2))
            .sum();
        if spread.sqrt() > 0.001 * last {
            let slope = (x - centre) / spread;
            for (w, j) in local.iter_mut().zip(left..=right) {
                *w *= slope * (j as f64 - centre) + 1.0;
            }
        }
    }

    Some(
        local
            .iter()
            .zip(&values[left..=right])
            .map(|(w, v)| w * v)
            .sum(),
    )
}

/// Bisquare robustness weights from the residual.
fn robustness_weights(residual: &[f64]) -> Vec<f64> {
    let n = residual.len();
    let mut sorted: Vec<f64> = residual.iter().map(|r| r.abs()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    // Floor keeps an exact fit from zeroing every weight
    let h = (6.0 * median).max(1e-8);

    residual
        .iter()
        .map(|r| {
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::statistics::Statistics;

    fn generate_seasonal_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let trend = 0.1 * i as f64;
                let seasonal =
                    10.0 * (2.0 * std::f64::consts::PI * i as f64 / SEASONAL_PERIOD as f64).sin();
                trend + seasonal
            })
            .collect()
    }

    #[test]
    fn stl_basic_decomposition() {
        let series = generate_seasonal_series(120);

        let result = STL::new().decompose(&series).unwrap();

        assert_eq!(result.observed, series);
        assert_eq!(result.trend.len(), series.len());
        assert_eq!(result.seasonal.len(), series.len());
        assert_eq!(result.residual.len(), series.len());

        // Verify additive decomposition: y = trend + seasonal + residual
        for i in 0..series.len() {
            let reconstructed = result.trend[i] + result.seasonal[i] + result.residual[i];
            assert!(
                (series[i] - reconstructed).abs() < 1e-10,
                "Reconstruction failed at index {}: {} vs {}",
                i,
                series[i],
                reconstructed
            );
        }
    }

    #[test]
    fn stl_recovers_seasonal_shape() {
        let series = generate_seasonal_series(120);
        let result = STL::new().decompose(&series).unwrap();

        // Away from the edges the seasonal component tracks the sine wave
        for i in 24..96 {
            let expected = 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin();
            assert!(
                (result.seasonal[i] - expected).abs() < 1.5,
                "seasonal[{}] = {}, expected about {}",
                i,
                result.seasonal[i],
                expected
            );
        }
    }

    #[test]
    fn stl_detects_seasonality() {
        let series = generate_seasonal_series(120);
        let result = STL::new().decompose(&series).unwrap();

        let strength = result.seasonal_strength().unwrap();
        assert!(
            strength > 0.5,
            "Expected strong seasonality, got {}",
            strength
        );
    }

    #[test]
    fn stl_detects_trend() {
        // Strong trend with weak seasonality
        let series: Vec<f64> = (0..120)
            .map(|i| {
                let trend = 2.0 * i as f64;
                let seasonal = 0.1 * ((2.0 * std::f64::consts::PI * i as f64 / 12.0).sin());
                trend + seasonal
            })
            .collect();

        let result = STL::new().decompose(&series).unwrap();

        let strength = result.trend_strength().unwrap();
        assert!(strength > 0.9, "Expected strong trend, got {}", strength);
    }

    #[test]
    fn stl_trend_only() {
        // Only trend, no seasonality
        let series: Vec<f64> = (0..96).map(|i| 5.0 + 0.5 * i as f64).collect();

        let result = STL::new().decompose(&series).unwrap();

        let seasonal_var = result.seasonal.iter().population_variance();
        let series_var = series.iter().population_variance();
        assert!(
            seasonal_var < series_var * 0.01,
            "Seasonal variance {} should be small compared to series variance {}",
            seasonal_var,
            series_var
        );
    }

    #[test]
    fn stl_constant_series() {
        let series = vec![5.0; 48];

        let result = STL::new().decompose(&series).unwrap();

        for &s in &result.seasonal {
            assert!(s.abs() < 1e-6, "Seasonal should be near zero");
        }
        for &r in &result.residual {
            assert!(r.abs() < 1e-6, "Residual should be near zero");
        }
        for &t in &result.trend {
            assert_relative_eq!(t, 5.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn stl_constant_series_has_undefined_strength() {
        let result = STL::new().decompose(&[3.0; 36]).unwrap();
        let err = result.strengths().unwrap_err();
        assert!(matches!(
            err,
            DecompositionError::DegenerateVariance {
                component: "trend",
                ..
            }
        ));
    }

    #[test]
    fn stl_insufficient_data() {
        let err = STL::new().decompose(&[1.0; 23]).unwrap_err();
        assert_eq!(
            err,
            DecompositionError::InsufficientData {
                needed: 24,
                got: 23
            }
        );
    }

    #[test]
    fn stl_minimum_length_is_two_cycles() {
        let series = generate_seasonal_series(24);
        let result = STL::new().decompose(&series).unwrap();
        assert_eq!(result.trend.len(), 24);
    }

    #[test]
    fn stl_partial_final_cycle() {
        let series = generate_seasonal_series(31);
        let result = STL::new().decompose(&series).unwrap();
        assert_eq!(result.seasonal.len(), 31);
        assert!(result.seasonal.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn stl_rejects_non_finite_input() {
        let mut series = generate_seasonal_series(36);
        series[5] = f64::NAN;
        assert!(matches!(
            STL::new().decompose(&series),
            Err(DecompositionError::ComputationError(_))
        ));
    }

    #[test]
    fn stl_robust_decomposition() {
        let mut series = generate_seasonal_series(120);
        // Add outliers
        series[30] = 100.0;
        series[60] = -100.0;

        let stl = STL::new().robust();
        assert!(stl.is_robust());
        let result = stl.decompose(&series).unwrap();

        // Outliers end up in the residual rather than the seasonal component
        assert!(result.residual[30] > 50.0);
        assert!(result.residual[60] < -50.0);

        let strength = result.seasonal_strength().unwrap();
        assert!(
            strength > 0.1,
            "Robust STL should still detect seasonality: {}",
            strength
        );
    }

    #[test]
    fn stl_custom_smoothness() {
        let series = generate_seasonal_series(120);

        let stl = STL::new()
            .with_seasonal_smoothness(8)
            .with_trend_smoothness(21)
            .with_inner_iterations(3);
        assert_eq!(stl.seasonal_smoothness(), 9);
        assert_eq!(stl.trend_smoothness(), 21);

        let result = stl.decompose(&series).unwrap();
        assert_eq!(result.trend.len(), series.len());
    }

    #[test]
    fn default_spans_are_odd() {
        let stl = STL::default();
        assert_eq!(stl.seasonal_smoothness(), 7);
        assert_eq!(stl.trend_smoothness(), 23);
        assert!(!stl.is_robust());
    }

    #[test]
    fn moving_average_keeps_full_windows() {
        let ma = moving_average(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(ma, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn loess_reproduces_a_line() {
        let line: Vec<f64> = (0..20).map(|i| 3.0 + 2.0 * i as f64).collect();
        let weights = vec![1.0; line.len()];
        let smoothed = loess_smooth(&line, &weights, 7);
        for (s, y) in smoothed.iter().zip(line.iter()) {
            assert_relative_eq!(s, y, epsilon = 1e-9);
        }
        // Extrapolation one step outside the data continues the line
        let before = loess_point(&line, &weights, 7, -1.0).unwrap();
        assert_relative_eq!(before, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn loess_bandwidth_widens_by_whole_points() {
        // Four points, span 7: at x = 0 the bandwidth is 3 + (7 - 4) / 2 = 4
        let values = [0.0, 4.0, 1.0, 6.0];
        let weights = [1.0; 4];

        // Weighted least-squares line through all points, evaluated at 0
        let fit_at_zero = |h: f64| {
            let w: Vec<f64> = (0..4)
                .map(|j| (1.0 - (j as f64 / h).powi(3)).powi(3))
                .collect();
            let sw: f64 = w.iter().sum();
            let sx: f64 = (0..4).map(|j| w[j] * j as f64).sum();
            let sy: f64 = (0..4).map(|j| w[j] * values[j]).sum();
            let sxx: f64 = (0..4).map(|j| w[j] * (j * j) as f64).sum();
            let sxy: f64 = (0..4).map(|j| w[j] * j as f64 * values[j]).sum();
            let slope = (sw * sxy - sx * sy) / (sw * sxx - sx * sx);
            (sy - slope * sx) / sw
        };

        let got = loess_point(&values, &weights, 7, 0.0).unwrap();
        assert_relative_eq!(got, fit_at_zero(4.0), epsilon = 1e-9);
        assert!((got - fit_at_zero(4.5)).abs() > 1e-3);
    }

    #[test]
    fn robustness_weights_downweight_outliers() {
        let mut residual = vec![0.1, -0.2, 0.15, -0.1, 0.05, 0.2];
        residual.push(50.0);
        let weights = robustness_weights(&residual);
        assert_eq!(weights[6], 0.0);
        assert!(weights[..6].iter().all(|w| *w > 0.5));
    }
}

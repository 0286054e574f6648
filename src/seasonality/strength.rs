//! Trend and seasonal strength from decomposition variances.
//!
//! Strength of a component `C` relative to the residual `R` is
//! `max(0, 1 - Var(R) / Var(C + R))`, using population variance.

use crate::error::{DecompositionError, Result};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Denominators below this are treated as zero.
pub const VARIANCE_EPSILON: f64 = 1e-10;

/// Trend and seasonal strength of one decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Strengths {
    pub trend: f64,
    pub seasonal: f64,
}

/// Strength of `component` against `residual`, clamped to `[0, 1]`.
///
/// `name` identifies the component in a [`DecompositionError::DegenerateVariance`].
pub fn strength(component: &[f64], residual: &[f64], name: &'static str) -> Result<f64> {
    if component.len() != residual.len() {
        return Err(DecompositionError::DimensionMismatch {
            expected: component.len(),
            got: residual.len(),
        });
    }
    if residual.is_empty() {
        return Err(DecompositionError::InsufficientData { needed: 1, got: 0 });
    }

    let var_residual = residual.iter().population_variance();
    let var_combined = component
        .iter()
        .zip(residual.iter())
        .map(|(c, r)| c + r)
        .population_variance();

    // NaN fails this comparison as well
    if !(var_combined >= VARIANCE_EPSILON) {
        return Err(DecompositionError::DegenerateVariance {
            component: name,
            variance: var_combined,
        });
    }

    Ok((1.0 - var_residual / var_combined).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_residual_gives_full_strength() {
        let trend: Vec<f64> = (0..24).map(|i| 100.0 + 2.0 * i as f64).collect();
        let seasonal: Vec<f64> = (0..24)
            .map(|i| 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).cos())
            .collect();
        let residual = vec![0.0; 24];

        assert_relative_eq!(strength(&trend, &residual, "trend").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            strength(&seasonal, &residual, "seasonal").unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn uses_population_variance() {
        // Var_pop(R) = 1, Var_pop(C + R) = 4 -> 1 - 1/4
        let residual = [1.0, -1.0, 1.0, -1.0];
        let component = [1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(
            strength(&component, &residual, "trend").unwrap(),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test]
    fn noise_dominated_component_is_clamped_to_zero() {
        // C + R has less variance than R
        let residual = [1.0, -1.0, 1.0, -1.0];
        let component = [-0.9, 0.9, -0.9, 0.9];
        assert_eq!(strength(&component, &residual, "seasonal").unwrap(), 0.0);
    }

    #[test]
    fn flat_denominator_is_degenerate() {
        let err = strength(&[2.0; 12], &[0.0; 12], "trend").unwrap_err();
        assert_eq!(
            err,
            DecompositionError::DegenerateVariance {
                component: "trend",
                variance: 0.0
            }
        );
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            strength(&[1.0, 2.0], &[0.0], "trend"),
            Err(DecompositionError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            strength(&[], &[], "trend"),
            Err(DecompositionError::InsufficientData { .. })
        ));
    }
}

//! Curve evaluation for the built-in growth models.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given `t` and shape parameters (for least squares)
//! - predict y(t) given the linear coefficients and shape parameters
//!
//! Shape parameters are the nonlinear part searched on a grid:
//!
//! | kind        | formula                         | betas  | shape     |
//! |-------------|---------------------------------|--------|-----------|
//! | linear      | `a + b·t`                       | `a, b` | (none)    |
//! | exponential | `a·exp(b·t)`                    | `a`    | `b`       |
//! | logistic    | `K / (1 + exp(-r·(t - t0)))`    | `K`    | `r, t0`   |

use serde::{Deserialize, Serialize};

use crate::math::{exp_growth, logistic_unit};

/// Concrete curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Linear,
    Exponential,
    Logistic,
}

impl CurveKind {
    /// Human-readable label for reports and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            CurveKind::Linear => "Linear",
            CurveKind::Exponential => "Exponential",
            CurveKind::Logistic => "Logistic",
        }
    }

    /// Number of linear coefficients solved by least squares.
    pub fn beta_len(self) -> usize {
        match self {
            CurveKind::Linear => 2,
            CurveKind::Exponential | CurveKind::Logistic => 1,
        }
    }

    /// Number of shape parameters searched on a grid.
    pub fn shape_len(self) -> usize {
        match self {
            CurveKind::Linear => 0,
            CurveKind::Exponential => 1,
            CurveKind::Logistic => 2,
        }
    }

    /// Total free parameters.
    pub fn param_count(self) -> usize {
        self.beta_len() + self.shape_len()
    }

    /// Whether solved coefficients describe a usable curve.
    ///
    /// Exponential and logistic scales must be positive: a negative scale flips
    /// the curve into decreasing cumulative counts.
    pub fn accepts(self, betas: &[f64]) -> bool {
        match self {
            CurveKind::Linear => betas.iter().all(|b| b.is_finite()),
            CurveKind::Exponential | CurveKind::Logistic => betas[0].is_finite() && betas[0] > 0.0,
        }
    }
}

/// Fill a design row for the given curve kind.
///
/// # Panics
/// Panics if `out` does not have length `kind.beta_len()` or `shape` does not have
/// length `kind.shape_len()`. Callers should size these arrays correctly.
pub fn fill_design_row(kind: CurveKind, t: f64, shape: &[f64], out: &mut [f64]) {
    match kind {
        CurveKind::Linear => {
            out[0] = 1.0;
            out[1] = t;
        }
        CurveKind::Exponential => {
            out[0] = exp_growth(t, shape[0]);
        }
        CurveKind::Logistic => {
            out[0] = logistic_unit(t, shape[0], shape[1]);
        }
    }
}

/// Predict `y(t)` for the given curve kind.
pub fn predict(kind: CurveKind, t: f64, betas: &[f64], shape: &[f64]) -> f64 {
    match kind {
        CurveKind::Linear => betas[0] + betas[1] * t,
        CurveKind::Exponential => betas[0] * exp_growth(t, shape[0]),
        CurveKind::Logistic => betas[0] * logistic_unit(t, shape[0], shape[1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_matches_design_row() {
        let cases: [(CurveKind, Vec<f64>, Vec<f64>); 3] = [
            (CurveKind::Linear, vec![2.0, 3.0], vec![]),
            (CurveKind::Exponential, vec![5.0], vec![0.2]),
            (CurveKind::Logistic, vec![1000.0], vec![0.3, 20.0]),
        ];
        for (kind, betas, shape) in cases {
            let mut row = vec![0.0; kind.beta_len()];
            fill_design_row(kind, 4.0, &shape, &mut row);
            let dot: f64 = row.iter().zip(&betas).map(|(r, b)| r * b).sum();
            assert!((dot - predict(kind, 4.0, &betas, &shape)).abs() < 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn logistic_saturates_at_capacity() {
        let y = predict(CurveKind::Logistic, 1e4, &[500.0], &[0.5, 10.0]);
        assert!((y - 500.0).abs() < 1e-9);
    }

    #[test]
    fn scale_must_be_positive_for_growth_curves() {
        assert!(!CurveKind::Exponential.accepts(&[-1.0]));
        assert!(CurveKind::Logistic.accepts(&[10.0]));
        assert!(CurveKind::Linear.accepts(&[-5.0, 1.0]));
    }
}

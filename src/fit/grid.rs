//! Shape-parameter grids.
//!
//! Exponential and logistic curves are fitted by a deterministic grid search over
//! their nonlinear parameters, solving the scale coefficient by least squares at
//! each grid point. The same inputs always select the same grid point.

use crate::error::AppError;
use crate::math::{lin_space, log_space};

/// Grid resolution and bounds for the nonlinear models.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Daily exponential growth rate bounds (`b` in `a·exp(b·t)`).
    pub exp_rate_min: f64,
    pub exp_rate_max: f64,
    pub exp_rate_steps: usize,

    /// Logistic growth rate bounds (`r`).
    pub logistic_rate_min: f64,
    pub logistic_rate_max: f64,
    pub logistic_rate_steps: usize,

    /// Number of logistic midpoints (`t0`) searched.
    pub logistic_mid_steps: usize,
    /// How far past the last observation the midpoint may lie, in multiples of
    /// the observed span. Early in an outbreak the inflection is still ahead.
    pub logistic_mid_extension: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            exp_rate_min: 1e-3,
            exp_rate_max: 1.0,
            exp_rate_steps: 200,
            logistic_rate_min: 0.01,
            logistic_rate_max: 1.5,
            logistic_rate_steps: 60,
            logistic_mid_steps: 80,
            logistic_mid_extension: 2.0,
        }
    }
}

/// Linear fits have no shape parameters: a single empty candidate.
pub fn linear_grid() -> Vec<Vec<f64>> {
    vec![Vec::new()]
}

/// Exponential grid: `[b]`.
pub fn exponential_grid(config: &GridConfig) -> Result<Vec<Vec<f64>>, AppError> {
    let rates = log_space(config.exp_rate_min, config.exp_rate_max, config.exp_rate_steps)?;
    Ok(rates.into_iter().map(|b| vec![b]).collect())
}

/// Logistic grid: `[r, t0]` with `t0` spanning the observed x range plus the
/// configured extension.
pub fn logistic_grid(config: &GridConfig, x: &[f64]) -> Result<Vec<Vec<f64>>, AppError> {
    let (x_min, x_max) = x_range(x)
        .ok_or_else(|| AppError::data("Logistic grid needs at least two distinct x values."))?;
    let span = x_max - x_min;

    let rates = log_space(
        config.logistic_rate_min,
        config.logistic_rate_max,
        config.logistic_rate_steps,
    )?;
    let mids = lin_space(
        x_min,
        x_max + config.logistic_mid_extension.max(0.0) * span,
        config.logistic_mid_steps,
    )?;

    let mut out = Vec::with_capacity(rates.len() * mids.len());
    for &r in &rates {
        for &t0 in &mids {
            out.push(vec![r, t0]);
        }
    }
    Ok(out)
}

fn x_range(x: &[f64]) -> Option<(f64, f64)> {
    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min.is_finite() && max.is_finite() && max > min).then_some((min, max))
}

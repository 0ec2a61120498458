//! Low-level fitting routine for a single curve kind.
//!
//! Given:
//! - day offsets `t_i`
//! - observed cumulative counts `y_i`
//! - a list of candidate shape tuples
//!
//! we solve, for each shape tuple:
//! - an OLS problem for the linear coefficients
//! - the resulting SSE
//!
//! and return the best (lowest SSE) candidate.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::AppError;
use crate::math::{r_squared, solve_least_squares};
use crate::models::{CurveKind, fill_design_row, predict};

/// Best fit for a single curve kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit {
    pub kind: CurveKind,
    pub betas: Vec<f64>,
    pub shape: Vec<f64>,
    pub sse: f64,
    /// R² on the observed data; `None` when undefined (constant observations).
    pub r2: Option<f64>,
}

impl CurveFit {
    pub fn predict(&self, t: f64) -> f64 {
        predict(self.kind, t, &self.betas, &self.shape)
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    shape: Vec<f64>,
    betas: Vec<f64>,
    sse: f64,
}

/// Fit a single curve kind over a shape grid.
pub fn fit_curve(kind: CurveKind, x: &[f64], y: &[f64], grid: &[Vec<f64>]) -> Result<CurveFit, AppError> {
    if x.len() != y.len() {
        return Err(AppError::runtime("x and y lengths differ."));
    }
    let needed = kind.param_count() + 1;
    if x.len() < needed {
        return Err(AppError::data(format!(
            "{} fit needs at least {needed} observations, got {}.",
            kind.display_name(),
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(AppError::runtime("Non-finite observation in fit input."));
    }
    if grid.is_empty() {
        return Err(AppError::runtime("Shape grid is empty."));
    }

    // Evaluate each shape tuple independently (parallel).
    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, shape)| {
            evaluate_candidate(kind, shape, x, y).map(|(betas, sse)| Candidate {
                idx,
                shape: shape.clone(),
                betas,
                sse,
            })
        })
        .collect();

    // Deterministic selection: pick the minimum SSE; break ties by original grid index.
    let Some(best) = candidates
        .iter()
        .min_by(|a, b| a.sse.total_cmp(&b.sse).then(a.idx.cmp(&b.idx)))
    else {
        return Err(AppError::runtime(format!(
            "No valid fit candidates for model {}.",
            kind.display_name()
        )));
    };

    tracing::debug!(
        model = kind.display_name(),
        candidates = candidates.len(),
        grid = grid.len(),
        sse = best.sse,
        "grid search complete"
    );

    let fitted: Vec<f64> = x.iter().map(|&t| predict(kind, t, &best.betas, &best.shape)).collect();

    Ok(CurveFit {
        kind,
        betas: best.betas.clone(),
        shape: best.shape.clone(),
        sse: best.sse,
        r2: r_squared(y, &fitted),
    })
}

fn evaluate_candidate(kind: CurveKind, shape: &[f64], x: &[f64], y: &[f64]) -> Option<(Vec<f64>, f64)> {
    let n = x.len();
    let p = kind.beta_len();

    let mut design = DMatrix::<f64>::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &t) in x.iter().enumerate() {
        fill_design_row(kind, t, shape, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }
    let obs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &obs)?;
    let betas: Vec<f64> = beta.iter().copied().collect();
    if !kind.accepts(&betas) {
        return None;
    }

    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&t, &yi)| {
            let r = yi - predict(kind, t, &betas, shape);
            r * r
        })
        .sum();

    sse.is_finite().then_some((betas, sse))
}

//! Least squares solver.
//!
//! Every built-in growth model is linear in its scale coefficients once the
//! nonlinear shape parameters are fixed:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! so the fitters solve a tiny regression (1–2 columns) per grid candidate.
//! SVD is used because the design matrix is tall and may be close to rank
//! deficient (e.g. a logistic midpoint far outside the data makes its column
//! almost constant).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

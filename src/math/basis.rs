//! Numerically safe basis functions for the growth models.
//!
//! - exponential: `e(t, b) = exp(b·t)`
//! - logistic:    `s(t, r, t0) = 1 / (1 + exp(-r·(t - t0)))`
//!
//! Numerical notes:
//! - `exp` overflows to `inf` for arguments above ~709. We clamp the exponent so
//!   grid candidates with absurd rates produce huge-but-finite columns that the
//!   SSE comparison simply rejects.
//! - The logistic is evaluated in the branch that never exponentiates a large
//!   positive number, so it stays in `[0, 1]` without `NaN`.

/// Largest exponent passed to `exp`.
const MAX_EXP_ARG: f64 = 700.0;

/// Compute `exp(b·t)` with a clamped exponent.
pub fn exp_growth(t: f64, b: f64) -> f64 {
    (b * t).min(MAX_EXP_ARG).exp()
}

/// Compute the unit logistic `1 / (1 + exp(-r·(t - t0)))`.
pub fn logistic_unit(t: f64, r: f64, t0: f64) -> f64 {
    let z = r * (t - t0);
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.max(-MAX_EXP_ARG).exp();
        e / (1.0 + e)
    }
}

//! Fit statistics and parameter grids.

use crate::error::AppError;

/// Sum of squared residuals between observed and fitted values.
pub fn sse(observed: &[f64], fitted: &[f64]) -> f64 {
    observed
        .iter()
        .zip(fitted)
        .map(|(y, f)| (y - f) * (y - f))
        .sum()
}

/// Coefficient of determination `R² = 1 - SSE/SST`.
///
/// Returns `None` when the observations are constant (SST = 0) or the result
/// is not finite; R² is undefined there rather than zero.
pub fn r_squared(observed: &[f64], fitted: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != fitted.len() {
        return None;
    }
    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;
    let sst: f64 = observed.iter().map(|y| (y - mean) * (y - mean)).sum();
    if sst <= 0.0 {
        return None;
    }
    let r2 = 1.0 - sse(observed, fitted) / sst;
    r2.is_finite().then_some(r2)
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(AppError::usage(format!(
            "Invalid grid range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::usage("Grid steps must be >= 2."));
    }

    let ln_min = min.ln();
    let step = (max.ln() - ln_min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| (ln_min + step * i as f64).exp()).collect())
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::usage(format!("Invalid grid range: min={min}, max={max}.")));
    }
    if steps < 2 {
        return Err(AppError::usage("Grid steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Round to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_squared_perfect_fit_is_one() {
        let y = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&y, &y), Some(1.0));
    }

    #[test]
    fn r_squared_constant_observations_is_undefined() {
        assert_eq!(r_squared(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn r_squared_can_be_negative() {
        let r2 = r_squared(&[1.0, 2.0, 3.0], &[10.0, 10.0, 10.0]).unwrap();
        assert!(r2 < 0.0);
    }

    #[test]
    fn log_space_endpoints() {
        let g = log_space(0.01, 1.0, 3).unwrap();
        assert!((g[0] - 0.01).abs() < 1e-12);
        assert!((g[1] - 0.1).abs() < 1e-12);
        assert!((g[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn grids_reject_bad_ranges() {
        assert!(log_space(0.0, 1.0, 5).is_err());
        assert!(lin_space(1.0, 1.0, 5).is_err());
        assert!(lin_space(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(8.333_333, 2), 8.33);
        assert_eq!(round_to(733.333_3, 1), 733.3);
    }
}

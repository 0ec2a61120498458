//! Unbounded exponential growth `y = a·exp(b·t)`.

use std::f64::consts::LN_2;

use crate::domain::ModelResult;
use crate::error::AppError;
use crate::fit::{GridConfig, exponential_grid, fit_curve};
use crate::models::projection::curve_result;
use crate::models::{CurveKind, FitInput, GrowthModel};

#[derive(Debug, Clone, Default)]
pub struct ExponentialModel {
    pub grid: GridConfig,
}

impl GrowthModel for ExponentialModel {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        let grid = exponential_grid(&self.grid)?;
        let fit = fit_curve(CurveKind::Exponential, input.x, input.y, &grid)?;

        let rate = fit.shape[0];
        let params = [
            ("a", format!("{:.2}", fit.betas[0])),
            ("b", format!("{rate:.4} ({:.1}% per day)", 100.0 * rate.exp_m1())),
            ("doubling time", format!("{:.1} days", LN_2 / rate)),
        ];
        Ok(curve_result(&fit, input, "y = a*exp(b*t)", &params))
    }
}

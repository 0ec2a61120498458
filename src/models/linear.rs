//! Straight-line model `y = a + b·t`.

use crate::domain::ModelResult;
use crate::error::AppError;
use crate::fit::{fit_curve, linear_grid};
use crate::models::projection::curve_result;
use crate::models::{CurveKind, FitInput, GrowthModel};

#[derive(Debug, Clone, Copy, Default)]
pub struct LinearModel;

impl GrowthModel for LinearModel {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        let fit = fit_curve(CurveKind::Linear, input.x, input.y, &linear_grid())?;
        let params = [
            ("a", format!("{:.2}", fit.betas[0])),
            ("b", format!("{:.2} cases/day", fit.betas[1])),
        ];
        Ok(curve_result(&fit, input, "y = a + b*t", &params))
    }
}

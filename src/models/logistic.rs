//! Saturating logistic growth `y = K / (1 + exp(-r·(t - t0)))`.
//!
//! `K` is the projected final size, `r` the growth rate and `t0` the inflection
//! day (offset from the series start).

use chrono::Duration;

use crate::domain::ModelResult;
use crate::error::AppError;
use crate::fit::{GridConfig, fit_curve, logistic_grid};
use crate::models::projection::curve_result;
use crate::models::{CurveKind, FitInput, GrowthModel};

#[derive(Debug, Clone, Default)]
pub struct LogisticModel {
    pub grid: GridConfig,
}

impl GrowthModel for LogisticModel {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        let grid = logistic_grid(&self.grid, input.x)?;
        let fit = fit_curve(CurveKind::Logistic, input.x, input.y, &grid)?;

        let (rate, mid) = (fit.shape[0], fit.shape[1]);
        let inflection = input.start_date + Duration::days(mid.round() as i64);
        let params = [
            ("K", format!("{:.0} (final size)", fit.betas[0])),
            ("r", format!("{rate:.4}")),
            ("t0", format!("{mid:.1} (inflection {inflection})")),
        ];
        Ok(curve_result(&fit, input, "y = K / (1 + exp(-r*(t - t0)))", &params))
    }
}

//! Turn a fitted curve into report text and chart points.

use chrono::NaiveDate;

use crate::domain::{Curve, ModelResult, offset_dates};
use crate::fit::CurveFit;
use crate::models::FitInput;
use crate::report::format_curve_record;

/// Forecast `(date, value)` pairs for the `predict_len` days after the last observation.
pub fn forecast(fit: &CurveFit, input: &FitInput<'_>) -> Vec<(NaiveDate, f64)> {
    let last = input.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !last.is_finite() {
        return Vec::new();
    }
    let offsets: Vec<f64> = (1..=input.predict_len).map(|d| last + d as f64).collect();
    let dates = offset_dates(input.start_date, offsets.iter().copied());
    dates
        .into_iter()
        .zip(offsets)
        .map(|(date, t)| (date, fit.predict(t)))
        .collect()
}

/// Curve over the observed x values followed by the forecast horizon.
pub fn curve(fit: &CurveFit, input: &FitInput<'_>, name: &str) -> Curve {
    let observed = offset_dates(input.start_date, input.x.iter().copied())
        .into_iter()
        .zip(input.x)
        .map(|(date, &t)| (date, fit.predict(t)));
    let points = observed.chain(forecast(fit, input)).collect();
    Curve {
        name: name.to_string(),
        points,
    }
}

/// Assemble the full result for a built-in model.
///
/// `params` lists `(symbol, formatted value)` pairs for the record.
pub fn curve_result(fit: &CurveFit, input: &FitInput<'_>, formula: &str, params: &[(&str, String)]) -> ModelResult {
    let name = fit.kind.display_name();
    let record = format_curve_record(name, formula, params, fit.r2, &forecast(fit, input));

    let mut result = ModelResult::new(record)
        .with_display_name(name)
        .with_curve(curve(fit, input, name));
    result.score = fit.r2;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurveKind;

    #[test]
    fn curve_spans_observed_and_forecast_days() {
        let fit = CurveFit {
            kind: CurveKind::Linear,
            betas: vec![1.0, 1.0],
            shape: vec![],
            sse: 0.0,
            r2: Some(1.0),
        };
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let start = NaiveDate::from_ymd_opt(2020, 3, 30).unwrap();
        let input = FitInput {
            x: &x,
            y: &y,
            predict_len: 2,
            start_date: start,
        };

        let c = curve(&fit, &input, "Linear");
        assert_eq!(c.points.len(), 5);
        assert_eq!(c.points[0], (start, 1.0));
        assert_eq!(c.points[4], (NaiveDate::from_ymd_opt(2020, 4, 3).unwrap(), 5.0));

        let f = forecast(&fit, &input);
        assert_eq!(f.len(), 2);
        assert_eq!(f[0].1, 4.0);
    }
}

//! Run every registered model against one series.
//!
//! Each fit is isolated: an error, a panic, or a malformed result (non-finite
//! score or curve value) becomes a failure note in that model's slot and the
//! remaining models still run. Outcomes are always stored in registry order, also
//! when fits run in parallel, so report order and tie-breaking do not depend on
//! scheduling.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use crate::domain::{ModelOutcome, ModelResult, ResultSet};
use crate::models::{FitInput, GrowthModel, ModelRegistry};
use crate::report::format_failure_note;

/// Fit all registry models and collect their outcomes.
pub fn run_models(registry: &ModelRegistry, input: &FitInput<'_>, parallel: bool) -> ResultSet {
    let outcomes: Vec<(String, ModelOutcome)> = if parallel {
        registry
            .entries()
            .par_iter()
            .map(|(name, model)| (name.clone(), fit_isolated(name, model.as_ref(), input)))
            .collect()
    } else {
        registry
            .entries()
            .iter()
            .map(|(name, model)| (name.clone(), fit_isolated(name, model.as_ref(), input)))
            .collect()
    };

    let mut results = ResultSet::new();
    for (name, outcome) in outcomes {
        results.insert(name, outcome);
    }
    results
}

fn fit_isolated(name: &str, model: &dyn GrowthModel, input: &FitInput<'_>) -> ModelOutcome {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| model.fit(input)));

    let reason = match attempt {
        Ok(Ok(result)) => match check_result(&result) {
            Ok(()) => {
                tracing::debug!(model = name, score = ?result.score, "model fitted");
                return ModelOutcome::Fitted(result);
            }
            Err(reason) => reason,
        },
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
    };

    tracing::warn!(model = name, %reason, "model fit failed");
    ModelOutcome::Failed {
        note: format_failure_note(name, &reason),
    }
}

/// Reject results that would poison selection or rendering.
fn check_result(result: &ModelResult) -> Result<(), String> {
    if let Some(score) = result.score {
        if !score.is_finite() {
            return Err(format!("non-finite fit-quality score ({score})"));
        }
    }
    if let Some(curve) = &result.curve {
        if curve.points.iter().any(|(_, y)| !y.is_finite()) {
            return Err("curve contains non-finite values".to_string());
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

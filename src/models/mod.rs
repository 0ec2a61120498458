//! Growth models and the registry that drives the fitting loop.
//!
//! A model is anything implementing [`GrowthModel`]: it receives the observed
//! series plus the forecast horizon and returns a [`ModelResult`] with a
//! mandatory text record and optional score, display name and curve.
//!
//! The built-in models share the curve evaluation in [`kind`] and differ only in
//! their grid and how they describe their parameters.

use chrono::NaiveDate;

use crate::domain::ModelResult;
use crate::error::AppError;

pub mod exponential;
pub mod kind;
pub mod linear;
pub mod logistic;
pub mod projection;
pub mod registry;

pub use exponential::ExponentialModel;
pub use kind::*;
pub use linear::LinearModel;
pub use logistic::LogisticModel;
pub use registry::ModelRegistry;

/// Everything a model needs to fit one series.
#[derive(Debug, Clone, Copy)]
pub struct FitInput<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// Number of future days to project.
    pub predict_len: usize,
    /// Date of `x = 0`.
    pub start_date: NaiveDate,
}

/// Fitting capability shared by every registered model.
pub trait GrowthModel: Send + Sync {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError>;
}

//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - generate shape grids for the nonlinear growth models
//! - evaluate each candidate shape tuple (parallel)
//! - run every registered model with failure isolation
//! - select the best model by fit-quality score

pub mod fitter;
pub mod grid;
pub mod orchestrator;
pub mod selection;

pub use fitter::*;
pub use grid::*;
pub use orchestrator::*;
pub use selection::*;

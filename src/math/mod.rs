//! Mathematical utilities: growth basis functions, least squares and fit statistics.

pub mod basis;
pub mod ols;
pub mod stats;

pub use basis::*;
pub use ols::*;
pub use stats::*;

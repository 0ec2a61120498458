//! Series analytics that do not involve model fitting.

pub mod growth;

pub use growth::*;

//! `case-modeler` library crate.
//!
//! The binary (`modeler`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - providers, models and renderers can be swapped by library users
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod report;
pub mod tui;

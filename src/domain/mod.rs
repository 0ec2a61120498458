//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`ModelSpec`, `SourceKind`, `ChartKind`)
//! - the observed case series (`Series`) and run context (`EntityContext`)
//! - fit outputs (`ModelResult`, `ModelOutcome`, `ResultSet`, `Curve`)

pub mod types;

pub use types::*;

//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between the analyzer, the models and the renderers without copying
//!   more than the series itself
//! - serialized (curves and chart requests) for optional JSON exports

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which growth model(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Linear,
    Logistic,
    Exponential,
}

impl ModelSpec {
    /// Default registry order.
    pub const ALL: [ModelSpec; 3] = [ModelSpec::Linear, ModelSpec::Logistic, ModelSpec::Exponential];

    /// Registry key.
    pub fn name(self) -> &'static str {
        match self {
            ModelSpec::Linear => "linear",
            ModelSpec::Logistic => "logistic",
            ModelSpec::Exponential => "exponential",
        }
    }
}

/// Where the case series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Download the JHU CSSE global confirmed-cases CSV.
    Jhu,
    /// Read a JHU CSSE formatted CSV from disk.
    File,
    /// Deterministic synthetic outbreak (offline).
    Sample,
}

/// How to render the chart at the end of a `report` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Ascii,
    Svg,
    None,
}

/// A date-ascending series of cumulative counts.
///
/// `x` holds the values the models are fitted on (day offsets from the first
/// date for every provider in this crate); `y` holds the counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    dates: Vec<NaiveDate>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Series {
    /// Build a series from raw provider output.
    ///
    /// Fails if the three sequences differ in length or the dates are not
    /// ascending; both indicate a malformed provider response.
    pub fn new(x: Vec<f64>, y: Vec<f64>, dates: Vec<NaiveDate>) -> Result<Self, AppError> {
        if x.len() != y.len() || y.len() != dates.len() {
            return Err(AppError::runtime(format!(
                "Malformed series: x={}, y={}, dates={} (lengths must match).",
                x.len(),
                y.len(),
                dates.len()
            )));
        }
        if dates.windows(2).any(|w| w[1] < w[0]) {
            return Err(AppError::runtime("Malformed series: dates are not ascending."));
        }
        if y.iter().chain(x.iter()).any(|v| !v.is_finite()) {
            return Err(AppError::runtime("Malformed series: non-finite value."));
        }
        Ok(Self { dates, x, y })
    }

    /// Build a series whose x-values are day offsets from the first date.
    pub fn from_counts(dates: Vec<NaiveDate>, counts: Vec<f64>) -> Result<Self, AppError> {
        let x = match dates.first() {
            Some(&start) => dates.iter().map(|d| (*d - start).num_days() as f64).collect(),
            None => Vec::new(),
        };
        Self::new(x, counts, dates)
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// Count at `idx`, truncated toward zero.
    pub fn count_at(&self, idx: usize) -> Option<i64> {
        self.y.get(idx).map(|&v| v.trunc() as i64)
    }

    /// Drop leading observations below `min_cases`, re-basing x on the new start.
    pub fn trim_leading(self, min_cases: f64) -> Result<Self, AppError> {
        let first = self.y.iter().position(|&v| v >= min_cases).unwrap_or(self.y.len());
        if first == 0 {
            return Ok(self);
        }
        let dates = self.dates[first..].to_vec();
        let counts = self.y[first..].to_vec();
        Self::from_counts(dates, counts)
    }
}

/// The entity being analyzed plus the forecast horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContext {
    pub name: String,
    pub predict_len: usize,
}

/// A renderable curve (observed span + forecast horizon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Output of one model fit.
///
/// Only `record` is mandatory; the other capabilities are independently optional
/// per model kind and must not be defaulted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelResult {
    pub record: String,
    /// Fit-quality score (R² for the built-in models). Higher is better.
    pub score: Option<f64>,
    pub display_name: Option<String>,
    pub curve: Option<Curve>,
}

impl ModelResult {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            ..Self::default()
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }
}

/// What the orchestrator recorded for one registry entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Fitted(ModelResult),
    /// The fit failed; the note replaces the model's text record.
    Failed { note: String },
}

impl ModelOutcome {
    pub fn record(&self) -> &str {
        match self {
            ModelOutcome::Fitted(result) => &result.record,
            ModelOutcome::Failed { note } => note,
        }
    }

    pub fn result(&self) -> Option<&ModelResult> {
        match self {
            ModelOutcome::Fitted(result) => Some(result),
            ModelOutcome::Failed { .. } => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.result().and_then(|r| r.score)
    }

    pub fn curve(&self) -> Option<&Curve> {
        self.result().and_then(|r| r.curve.as_ref())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ModelOutcome::Failed { .. })
    }
}

/// Run-scoped, registry-ordered mapping of model name to outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    entries: Vec<(String, ModelOutcome)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the outcome for `name`, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, outcome: ModelOutcome) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = outcome,
            None => self.entries.push((name, outcome)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelOutcome> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelOutcome)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where and how to obtain series.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// CSV path for `SourceKind::File` (falls back to `MODELER_DATA_FILE`).
    pub file: Option<PathBuf>,
    /// CSV URL for `SourceKind::Jhu` (falls back to `MODELER_DATA_URL`).
    pub url: Option<String>,
    /// Seed for `SourceKind::Sample`.
    pub seed: u64,
}

/// A run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags plus environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub country: String,
    pub predict_len: usize,
    pub models: Vec<ModelSpec>,

    pub source: SourceConfig,
    /// When set, leading days below this cumulative count are dropped before analysis.
    pub min_cases: Option<f64>,

    pub parallel: bool,

    pub chart: ChartKind,
    pub svg_out: PathBuf,
    pub width: usize,
    pub height: usize,
    pub export_chart: Option<PathBuf>,
}

/// Dates `start + offset` days for each offset (fractional offsets are floored).
pub fn offset_dates(start: NaiveDate, offsets: impl IntoIterator<Item = f64>) -> Vec<NaiveDate> {
    offsets
        .into_iter()
        .map(|t| start + Duration::days(t.floor() as i64))
        .collect()
}

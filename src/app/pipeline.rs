//! Shared "process one entity" logic used by the CLI report, the TUI and tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! series fetch -> growth statistics -> model fits -> selection -> report + chart
//!
//! Front-ends then only deal with presentation (printing vs widgets).

use crate::analysis::{GrowthStats, analyze_growth};
use crate::chart::{ChartRequest, assemble_chart};
use crate::data::SeriesProvider;
use crate::domain::{EntityContext, ResultSet, Series};
use crate::error::AppError;
use crate::fit::{BestModel, run_models, select_best};
use crate::models::{FitInput, ModelRegistry};
use crate::report::{Report, assemble_report};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub context: EntityContext,
    pub series: Series,
    pub growth: Option<GrowthStats>,
    pub results: ResultSet,
    pub best: Option<BestModel>,
    pub report: Report,
    pub chart: ChartRequest,
}

/// Binds a series source to a model registry.
///
/// Holds no per-run state: every [`process`](Self::process) call builds its
/// result set, report and chart from scratch.
pub struct Modeler {
    provider: Box<dyn SeriesProvider>,
    registry: ModelRegistry,
    /// Unset: the provider's series is analyzed as delivered.
    min_cases: Option<f64>,
    parallel: bool,
}

impl Modeler {
    pub fn new(provider: Box<dyn SeriesProvider>, registry: ModelRegistry) -> Self {
        Self {
            provider,
            registry,
            min_cases: None,
            parallel: false,
        }
    }

    /// Drop leading observations below `min_cases` before analysis.
    pub fn with_min_cases(mut self, min_cases: f64) -> Self {
        self.min_cases = Some(min_cases);
        self
    }

    /// Fit registry models concurrently (outcomes stay in registry order).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn provider(&self) -> &dyn SeriesProvider {
        self.provider.as_ref()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run the whole pipeline for one entity.
    pub fn process(&self, context: &EntityContext) -> Result<RunOutput, AppError> {
        tracing::info!(entity = %context.name, predict_len = context.predict_len, "processing entity");

        let mut series = self.provider.get(&context.name)?;
        if let Some(min_cases) = self.min_cases {
            series = series.trim_leading(min_cases)?;
        }
        let Some(start_date) = series.start_date() else {
            return Err(AppError::data(match self.min_cases {
                Some(min_cases) => {
                    format!("No observations with at least {min_cases} cases for '{}'.", context.name)
                }
                None => format!("No observations for '{}'.", context.name),
            }));
        };

        let growth = analyze_growth(&context.name, &series);

        let input = FitInput {
            x: series.x(),
            y: series.y(),
            predict_len: context.predict_len,
            start_date,
        };
        let results = run_models(&self.registry, &input, self.parallel);
        let best = select_best(&results);

        let report = assemble_report(growth.as_ref(), &results, best.as_ref());
        let chart = assemble_chart(context, &series, &results);

        tracing::info!(
            entity = %context.name,
            observations = series.len(),
            models = results.len(),
            best = ?best.as_ref().map(|b| b.name.as_str()),
            "run complete"
        );

        Ok(RunOutput {
            context: context.clone(),
            series,
            growth,
            results,
            best,
            report,
            chart,
        })
    }
}

impl std::fmt::Debug for Modeler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modeler")
            .field("registry", &self.registry)
            .field("min_cases", &self.min_cases)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

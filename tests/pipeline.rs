//! End-to-end runs of the pipeline through the public API, using an in-memory
//! provider and stub models.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use case_modeler::app::Modeler;
use case_modeler::data::{SampleProvider, SeriesProvider};
use case_modeler::domain::{Curve, EntityContext, ModelResult, Series};
use case_modeler::error::{AppError, EXIT_DATA};
use case_modeler::models::{FitInput, GrowthModel, ModelRegistry};

struct MemoryProvider {
    series: HashMap<String, Series>,
}

impl MemoryProvider {
    fn new(entries: &[(&str, &[f64])]) -> Self {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let series = entries
            .iter()
            .map(|(name, counts)| {
                let dates = (0..counts.len()).map(|i| start + Duration::days(i as i64)).collect();
                (name.to_string(), Series::from_counts(dates, counts.to_vec()).unwrap())
            })
            .collect();
        Self { series }
    }
}

impl SeriesProvider for MemoryProvider {
    fn get(&self, entity: &str) -> Result<Series, AppError> {
        self.series
            .get(entity)
            .cloned()
            .ok_or_else(|| AppError::data(format!("Unknown country '{entity}'.")))
    }

    fn entities(&self) -> Result<Vec<String>, AppError> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Returns a fixed record and score, plus a flat curve over the observed span.
struct Scored {
    label: &'static str,
    score: Option<f64>,
}

impl GrowthModel for Scored {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        let points = input
            .x
            .iter()
            .map(|t| (input.start_date + Duration::days(*t as i64), 1.0))
            .collect();
        let mut result = ModelResult::new(format!("\n{} record\n", self.label))
            .with_display_name(self.label)
            .with_curve(Curve {
                name: self.label.to_string(),
                points,
            });
        result.score = self.score;
        Ok(result)
    }
}

/// Records what it was handed: start date and number of observations.
struct Echo;

impl GrowthModel for Echo {
    fn fit(&self, input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        Ok(ModelResult::new(format!(
            "\nstart={} n={}\n",
            input.start_date,
            input.x.len()
        )))
    }
}

struct Failing;

impl GrowthModel for Failing {
    fn fit(&self, _input: &FitInput<'_>) -> Result<ModelResult, AppError> {
        Err(AppError::runtime("solver diverged"))
    }
}

const GROWING: [f64; 10] = [5.0, 8.0, 12.0, 20.0, 30.0, 45.0, 60.0, 75.0, 90.0, 100.0];
const SHRINKING: [f64; 10] = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0];
const ZEROS: [f64; 10] = [0.0; 10];
const LATE_START: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0];

fn modeler(registry: ModelRegistry) -> Modeler {
    let provider = MemoryProvider::new(&[
        ("Alpha", &GROWING[..]),
        ("Beta", &SHRINKING[..]),
        ("Short", &GROWING[..7]),
        ("Zeros", &ZEROS[..]),
        ("Late", &LATE_START[..]),
    ]);
    Modeler::new(Box::new(provider), registry)
}

fn context(name: &str) -> EntityContext {
    EntityContext {
        name: name.to_string(),
        predict_len: 5,
    }
}

fn scored(scores: [Option<f64>; 3]) -> ModelRegistry {
    ModelRegistry::new()
        .with("a", Scored { label: "A", score: scores[0] })
        .with("b", Scored { label: "B", score: scores[1] })
        .with("c", Scored { label: "C", score: scores[2] })
}

#[test]
fn report_has_growth_records_and_best_in_order() {
    let run = modeler(scored([Some(0.5), Some(0.9), Some(0.3)]))
        .process(&context("Alpha"))
        .unwrap();

    let expected = "\
Results for *Alpha*
** Based on the last week of data **
    Confirmed cases on 2020-03-10    100
    Confirmed cases on 2020-03-03    12
    Ratio: 8.33
    Weekly increase: 733.3%
    Daily increase: 35.4% per day
    Doubling time (at current rate): 2.3 days

A record

B record

C record

Best model: B (R2 = 0.9)
";
    assert_eq!(run.report.as_str(), expected);
    assert_eq!(run.best.unwrap().name, "b");
}

#[test]
fn first_model_wins_ties() {
    let run = modeler(scored([Some(0.9), Some(0.9), Some(0.3)]))
        .process(&context("Alpha"))
        .unwrap();
    assert_eq!(run.best.unwrap().name, "a");
    assert!(run.report.as_str().ends_with("\nBest model: A (R2 = 0.9)\n"));
}

#[test]
fn no_positive_score_means_no_best_line() {
    let run = modeler(scored([Some(0.0), Some(-0.4), None]))
        .process(&context("Alpha"))
        .unwrap();
    assert!(run.best.is_none());
    assert!(!run.report.as_str().contains("Best model"));
}

#[test]
fn failing_model_is_isolated() {
    let registry = ModelRegistry::new()
        .with("a", Scored { label: "A", score: Some(0.5) })
        .with("broken", Failing)
        .with("c", Scored { label: "C", score: Some(0.7) });
    let run = modeler(registry).process(&context("Alpha")).unwrap();

    let report = run.report.as_str();
    assert!(report.contains("\nA record\n"));
    assert!(report.contains("\nModel 'broken' failed: solver diverged\n"));
    assert!(report.contains("\nC record\n"));
    assert!(report.ends_with("\nBest model: C (R2 = 0.7)\n"));

    assert!(run.results.get("broken").unwrap().is_failed());
    // Observed series plus the two curves that exist.
    assert_eq!(run.chart.series.len(), 3);
}

#[test]
fn consecutive_runs_do_not_leak_state() {
    let modeler = modeler(scored([Some(0.5), Some(0.9), Some(0.3)]));
    let first = modeler.process(&context("Alpha")).unwrap();
    let second = modeler.process(&context("Beta")).unwrap();

    assert!(first.report.as_str().contains("Alpha"));
    assert!(!second.report.as_str().contains("Alpha"));
    assert_eq!(second.results.len(), 3);
    assert_eq!(second.chart.title, "Beta");
    // Flat week: no growth section.
    assert!(second.growth.is_none());
    assert!(second.report.as_str().starts_with("\nA record\n"));
}

#[test]
fn seven_observations_skip_growth_section() {
    let run = modeler(scored([Some(0.5), None, None]))
        .process(&context("Short"))
        .unwrap();
    assert!(run.growth.is_none());
    assert!(!run.report.as_str().contains("Results for"));
}

#[test]
fn unknown_entity_is_a_data_error() {
    let err = modeler(ModelRegistry::new()).process(&context("Gamma")).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA);
}

#[test]
fn all_zero_series_runs_from_its_first_date() {
    let run = modeler(ModelRegistry::new().with("echo", Echo))
        .process(&context("Zeros"))
        .unwrap();

    assert_eq!(run.series.len(), 10);
    assert_eq!(run.series.start_date(), NaiveDate::from_ymd_opt(2020, 3, 1));
    assert!(run.growth.is_none());
    assert_eq!(run.report.as_str(), "\nstart=2020-03-01 n=10\n");
    assert!(run.best.is_none());
}

#[test]
fn leading_zeros_are_kept_by_default() {
    let run = modeler(ModelRegistry::new().with("echo", Echo))
        .process(&context("Late"))
        .unwrap();

    assert_eq!(run.series.start_date(), NaiveDate::from_ymd_opt(2020, 3, 1));
    assert!(run.report.as_str().contains("\nstart=2020-03-01 n=9\n"));

    // Last week's count is zero, so the section exists with undefined figures.
    let growth = run.growth.unwrap();
    assert_eq!((growth.lastweek, growth.current), (0, 5));
    assert_eq!(growth.ratio, None);
    assert!(run.report.as_str().contains("    Ratio: n/a\n"));
}

#[test]
fn min_cases_trims_leading_days() {
    let run = modeler(scored([Some(0.5), None, None]))
        .with_min_cases(20.0)
        .process(&context("Alpha"))
        .unwrap();
    assert_eq!(run.series.len(), 7);
    assert_eq!(run.series.start_date(), NaiveDate::from_ymd_opt(2020, 3, 4));

    let err = modeler(ModelRegistry::new())
        .with_min_cases(1_000.0)
        .process(&context("Alpha"))
        .unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA);
}

#[test]
fn built_in_models_on_sample_data() {
    let modeler = Modeler::new(Box::new(SampleProvider::new(7)), ModelRegistry::with_defaults());
    let sequential = modeler.process(&context("Spain")).unwrap();
    let parallel = Modeler::new(Box::new(SampleProvider::new(7)), ModelRegistry::with_defaults())
        .with_parallel(true)
        .process(&context("Spain"))
        .unwrap();

    let names: Vec<&str> = sequential.results.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["linear", "logistic", "exponential"]);
    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.report, parallel.report);

    let curves = sequential.results.iter().filter(|(_, o)| o.curve().is_some()).count();
    assert_eq!(sequential.chart.series.len(), 1 + curves);

    // Every curve covers the observed span plus the forecast horizon.
    for (_, outcome) in sequential.results.iter() {
        if let Some(curve) = outcome.curve() {
            assert_eq!(curve.points.len(), sequential.series.len() + 5);
        }
    }
    assert!(sequential.best.is_some());
}

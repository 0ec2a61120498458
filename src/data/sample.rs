//! Synthetic outbreak generation for offline runs.
//!
//! Each entity gets its own logistic epidemic whose capacity, growth rate and
//! midpoint are drawn from an RNG seeded by the entity name and the user seed, so
//! the same `(entity, seed)` always produces the same series. Daily new cases get
//! log-normal noise and are accumulated, which keeps the cumulative series
//! non-decreasing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::SeriesProvider;
use crate::domain::Series;
use crate::error::AppError;

/// Entities listed by `modeler countries --source sample`. Any other name also works.
pub const SAMPLE_ENTITIES: [&str; 8] = [
    "Argentina", "Brazil", "Chile", "Germany", "Italy", "Japan", "Spain", "Sweden",
];

/// Log-scale std dev of the daily-new-case noise.
const NOISE_SIGMA: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct SampleProvider {
    pub seed: u64,
    /// Observed days per series.
    pub days: usize,
    pub start: NaiveDate,
}

impl SampleProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            days: 60,
            start: NaiveDate::from_ymd_opt(2020, 2, 15).unwrap_or(NaiveDate::MIN),
        }
    }
}

impl SeriesProvider for SampleProvider {
    fn get(&self, entity: &str) -> Result<Series, AppError> {
        if entity.trim().is_empty() {
            return Err(AppError::usage("Entity name must not be empty."));
        }
        let counts = generate_counts(entity, self.seed, self.days)?;
        let dates = (0..self.days).map(|i| self.start + Duration::days(i as i64)).collect();
        Series::from_counts(dates, counts)
    }

    fn entities(&self) -> Result<Vec<String>, AppError> {
        Ok(SAMPLE_ENTITIES.iter().map(|s| s.to_string()).collect())
    }
}

/// Cumulative counts for a noisy logistic outbreak.
pub fn generate_counts(entity: &str, seed: u64, days: usize) -> Result<Vec<f64>, AppError> {
    let mut rng = StdRng::seed_from_u64(sample_seed(entity, seed));
    let normal = Normal::new(0.0, NOISE_SIGMA)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;

    let capacity: f64 = rng.gen_range(5_000.0..200_000.0);
    let rate: f64 = rng.gen_range(0.12..0.30);
    let midpoint = days as f64 * rng.gen_range(0.55_f64..1.1);

    let logistic = |t: f64| capacity / (1.0 + (-rate * (t - midpoint)).exp());
    // E[exp(z)] == 1 for z ~ N(-σ²/2, σ²).
    let mean_correction = 0.5 * NOISE_SIGMA * NOISE_SIGMA;

    let mut counts = Vec::with_capacity(days);
    let mut total = logistic(0.0).round();
    for day in 0..days {
        if day > 0 {
            let t = day as f64;
            let new_cases = (logistic(t) - logistic(t - 1.0)).max(0.0);
            let noise = (normal.sample(&mut rng) - mean_correction).exp();
            total += (new_cases * noise).round();
        }
        counts.push(total);
    }

    Ok(counts)
}

fn sample_seed(entity: &str, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    entity.trim().to_lowercase().hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}

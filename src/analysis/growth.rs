//! Week-over-week growth statistics from the tail of a case series.
//!
//! Given the last count (`current`) and the count seven observations earlier
//! (`lastweek`), both truncated to integers:
//!
//! - `ratio = current / lastweek`
//! - weekly increase `100·(ratio − 1)`
//! - daily change `100·(ratio^(1/7) − 1)`
//! - doubling time `7·ln 2 / ln(ratio)`
//!
//! The section only exists for a strictly increasing week. Figures that are
//! undefined for the observed ratio (zero baseline, ratio of exactly 1, non-positive
//! ratio after negative corrections) are `None` and print as "n/a".

use std::f64::consts::LN_2;

use chrono::NaiveDate;

use crate::domain::Series;
use crate::math::round_to;

/// Observations needed to look one week back from the last entry (index `L − 8`).
pub const MIN_GROWTH_POINTS: usize = 8;

/// Offset of the "last week" observation from the last entry.
const WEEK: usize = 7;

/// Growth figures for the most recent week.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthStats {
    pub entity: String,
    pub current_date: NaiveDate,
    pub current: i64,
    pub lastweek_date: NaiveDate,
    pub lastweek: i64,
    /// Unrounded `current / lastweek`; `None` when `lastweek` is zero.
    pub ratio: Option<f64>,
}

impl GrowthStats {
    /// The ratio when every figure derived from it is meaningful (positive).
    fn usable_ratio(&self) -> Option<f64> {
        self.ratio.filter(|r| *r > 0.0)
    }

    /// Ratio rounded to 2 decimals.
    pub fn ratio_rounded(&self) -> Option<f64> {
        self.usable_ratio().map(|r| round_to(r, 2))
    }

    /// Weekly percent increase rounded to 1 decimal.
    pub fn weekly_increase_pct(&self) -> Option<f64> {
        self.usable_ratio().map(|r| round_to(100.0 * (r - 1.0), 1))
    }

    /// Daily percent change rounded to 1 decimal.
    pub fn daily_change_pct(&self) -> Option<f64> {
        self.usable_ratio()
            .map(|r| round_to(100.0 * (r.powf(1.0 / WEEK as f64) - 1.0), 1))
    }

    /// Doubling time in days rounded to 1 decimal.
    pub fn doubling_time_days(&self) -> Option<f64> {
        self.ratio.and_then(doubling_time).map(|d| round_to(d, 1))
    }
}

/// `current / lastweek`, or `None` when the baseline is zero.
pub fn growth_ratio(current: i64, lastweek: i64) -> Option<f64> {
    if lastweek == 0 {
        return None;
    }
    let ratio = current as f64 / lastweek as f64;
    ratio.is_finite().then_some(ratio)
}

/// Days to double at a constant weekly `ratio`.
///
/// Undefined (`None`) for `ratio == 1` (no growth), non-positive or non-finite ratios.
pub fn doubling_time(ratio: f64) -> Option<f64> {
    if !(ratio.is_finite() && ratio > 0.0) || ratio == 1.0 {
        return None;
    }
    let days = WEEK as f64 * LN_2 / ratio.ln();
    days.is_finite().then_some(days)
}

/// Compute the growth section for `entity`, if the series supports one.
///
/// Returns `None` (silently) when the series is too short or the count did not
/// strictly increase over the last week.
pub fn analyze_growth(entity: &str, series: &Series) -> Option<GrowthStats> {
    let len = series.len();
    if len < MIN_GROWTH_POINTS {
        tracing::debug!(entity, len, "series too short for growth statistics");
        return None;
    }

    let last = len - 1;
    let prior = last - WEEK;
    let current = series.count_at(last)?;
    let lastweek = series.count_at(prior)?;

    if current <= lastweek {
        tracing::debug!(entity, current, lastweek, "no weekly increase; growth section omitted");
        return None;
    }

    Some(GrowthStats {
        entity: entity.to_string(),
        current_date: series.dates()[last],
        current,
        lastweek_date: series.dates()[prior],
        lastweek,
        ratio: growth_ratio(current, lastweek),
    })
}

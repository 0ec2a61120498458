//! Chart assembly and rendering.
//!
//! The pipeline only *describes* the chart ([`ChartRequest`]): one marker series
//! for the observed counts and one line series per model curve. Turning that
//! description into pixels or characters is the job of a [`ChartRenderer`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EntityContext, ResultSet, Series, offset_dates};
use crate::error::AppError;

pub mod ascii;
pub mod export;
pub mod svg;

pub use ascii::{AsciiRenderer, render_ascii_chart};
pub use export::{read_chart_json, write_chart_json};
pub use svg::SvgRenderer;

/// Legend label of the observed-data series.
pub const OBSERVED_LABEL: &str = "Confirmed cases";

/// RGB colour of the observed-data markers.
pub const OBSERVED_RGB: (u8, u8, u8) = (31, 119, 180);

/// RGB colours cycled over model curves (high contrast on dark and light backgrounds).
pub const CURVE_RGB: [(u8, u8, u8); 5] = [
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (23, 190, 207),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Markers,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub name: String,
    pub style: SeriesStyle,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Everything a renderer needs to draw one run's chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub title: String,
    pub x_axis: AxisType,
    pub series: Vec<PlotSeries>,
}

impl ChartRequest {
    /// Earliest and latest date over all series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Smallest and largest value over all series, if they differ.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (_, y) in self.series.iter().flat_map(|s| s.points.iter()) {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
        (min_y.is_finite() && max_y.is_finite() && max_y > min_y).then_some((min_y, max_y))
    }
}

/// Something that can display a chart (terminal, file, widget...).
pub trait ChartRenderer {
    fn render(&self, chart: &ChartRequest) -> Result<(), AppError>;
}

/// Build the chart for one run: observed counts first, then every model curve in
/// registry order. Models without a curve contribute nothing.
pub fn assemble_chart(context: &EntityContext, series: &Series, results: &ResultSet) -> ChartRequest {
    let mut plot = Vec::with_capacity(results.len() + 1);

    let observed = match series.start_date() {
        Some(start) => offset_dates(start, (0..series.len()).map(|i| i as f64))
            .into_iter()
            .zip(series.y().iter().copied())
            .collect(),
        None => Vec::new(),
    };
    plot.push(PlotSeries {
        name: OBSERVED_LABEL.to_string(),
        style: SeriesStyle::Markers,
        points: observed,
    });

    for (_, outcome) in results.iter() {
        if let Some(curve) = outcome.curve() {
            plot.push(PlotSeries {
                name: curve.name.clone(),
                style: SeriesStyle::Lines,
                points: curve.points.clone(),
            });
        }
    }

    ChartRequest {
        title: context.name.clone(),
        x_axis: AxisType::Date,
        series: plot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, ModelOutcome, ModelResult};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    #[test]
    fn observed_series_then_curves_in_registry_order() {
        let series = Series::from_counts(vec![d(1), d(2), d(4)], vec![1.0, 3.0, 9.0]).unwrap();
        let context = EntityContext {
            name: "Peru".to_string(),
            predict_len: 1,
        };
        let curve = |name: &str| Curve {
            name: name.to_string(),
            points: vec![(d(1), 1.0), (d(5), 10.0)],
        };

        let mut results = ResultSet::new();
        results.insert("b", ModelOutcome::Fitted(ModelResult::new("b").with_curve(curve("B"))));
        results.insert("no-curve", ModelOutcome::Fitted(ModelResult::new("plain")));
        results.insert("failed", ModelOutcome::Failed { note: "x".to_string() });
        results.insert("a", ModelOutcome::Fitted(ModelResult::new("a").with_curve(curve("A"))));

        let chart = assemble_chart(&context, &series, &results);
        assert_eq!(chart.title, "Peru");
        assert_eq!(chart.x_axis, AxisType::Date);

        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![OBSERVED_LABEL, "B", "A"]);
        assert_eq!(chart.series[0].style, SeriesStyle::Markers);
        assert_eq!(chart.series[1].style, SeriesStyle::Lines);

        // Observed dates run day by day from the start for the series length.
        assert_eq!(chart.series[0].points, vec![(d(1), 1.0), (d(2), 3.0), (d(3), 9.0)]);
        assert_eq!(chart.date_range(), Some((d(1), d(5))));
        assert_eq!(chart.value_range(), Some((1.0, 10.0)));
    }
}

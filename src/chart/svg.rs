//! SVG chart output via Plotters.
//!
//! Observed counts are drawn as filled circles, model curves as lines, with a
//! legend and date-formatted x ticks. The x axis is plotted in day offsets from
//! the earliest date and relabelled as dates.

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Duration;
use plotters::prelude::*;

use crate::chart::{CURVE_RGB, ChartRenderer, ChartRequest, OBSERVED_RGB, SeriesStyle};
use crate::error::AppError;

/// Writes the chart to an SVG file.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, chart: &ChartRequest) -> Result<(), AppError> {
        draw_svg(chart, &self.path, (self.width, self.height)).map_err(|e| {
            AppError::runtime(format!("Failed to render SVG '{}': {e}", self.path.display()))
        })?;
        tracing::info!(path = %self.path.display(), "wrote SVG chart");
        println!("Chart written to {}", self.path.display());
        Ok(())
    }
}

fn draw_svg(chart: &ChartRequest, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let Some((d_min, d_max)) = chart.date_range() else {
        return Err("chart has no data".into());
    };
    let t_max = ((d_max - d_min).num_days() as f64).max(1.0);
    let (y0, y1) = chart.value_range().unwrap_or((0.0, 1.0));
    let pad = (y1 - y0) * 0.05;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..t_max, (y0 - pad)..(y1 + pad))?;

    ctx.configure_mesh()
        .x_desc("Date")
        .y_desc("Cases")
        .x_labels(8)
        .x_label_formatter(&|t| {
            (d_min + Duration::days(t.round() as i64))
                .format("%Y-%m-%d")
                .to_string()
        })
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    let (r, g, b) = OBSERVED_RGB;
    let observed_color = RGBColor(r, g, b);
    let mut curve_colors = CURVE_RGB.iter().cycle();

    for series in &chart.series {
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(d, y)| ((d - d_min).num_days() as f64, y))
            .collect();

        match series.style {
            SeriesStyle::Markers => {
                ctx.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, 3, observed_color.filled())),
                )?
                .label(series.name.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), 3, observed_color.filled()));
            }
            SeriesStyle::Lines => {
                let (r, g, b) = curve_colors.next().copied().unwrap_or(OBSERVED_RGB);
                let color = RGBColor(r, g, b);
                ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

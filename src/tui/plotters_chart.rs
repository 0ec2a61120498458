//! Plotters-powered case chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - the same drawing code style as the SVG export
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{CURVE_RGB, ChartRequest, OBSERVED_RGB, SeriesStyle};

/// One chart series in plot coordinates (day offset, count).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub style: SeriesStyle,
    pub rgb: (u8, u8, u8),
    pub points: Vec<(f64, f64)>,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, in
/// [`chart_lines`], so the data prep can be tested without a terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct CasePlottersChart {
    /// Date of `x = 0`.
    pub start: NaiveDate,
    pub lines: Vec<PlotLine>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Convert a chart request into plot coordinates with padded bounds.
pub fn chart_lines(chart: &ChartRequest) -> Option<CasePlottersChart> {
    let (start, end) = chart.date_range()?;
    let x_bounds = [0.0, ((end - start).num_days() as f64).max(1.0)];

    let (y_min, y_max) = chart.value_range().unwrap_or((0.0, 1.0));
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    let mut curve_idx = 0usize;
    let lines = chart
        .series
        .iter()
        .map(|s| {
            let rgb = match s.style {
                SeriesStyle::Markers => OBSERVED_RGB,
                SeriesStyle::Lines => {
                    let rgb = CURVE_RGB[curve_idx % CURVE_RGB.len()];
                    curve_idx += 1;
                    rgb
                }
            };
            PlotLine {
                style: s.style,
                rgb,
                points: s
                    .points
                    .iter()
                    .map(|(d, y)| ((*d - start).num_days() as f64, *y))
                    .collect(),
            }
        })
        .collect();

    Some(CasePlottersChart {
        start,
        lines,
        x_bounds,
        y_bounds,
    })
}

impl Widget for CasePlottersChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(5)
                .y_labels(5)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for line in &self.lines {
                let color = RGBColor(line.rgb.0, line.rgb.1, line.rgb.2);
                match line.style {
                    SeriesStyle::Lines => {
                        chart.draw_series(LineSeries::new(line.points.iter().copied(), &color))?;
                    }
                    // `Circle` radii are mis-scaled by the ratatui backend; pixels read as dots.
                    SeriesStyle::Markers => {
                        chart.draw_series(line.points.iter().map(|&(x, y)| Pixel::new((x, y), color)))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AxisType, PlotSeries};

    #[test]
    fn chart_lines_uses_day_offsets_and_palette() {
        let d = |day| NaiveDate::from_ymd_opt(2020, 3, day).unwrap();
        let chart = ChartRequest {
            title: "Spain".to_string(),
            x_axis: AxisType::Date,
            series: vec![
                PlotSeries {
                    name: "obs".to_string(),
                    style: SeriesStyle::Markers,
                    points: vec![(d(1), 10.0), (d(3), 30.0)],
                },
                PlotSeries {
                    name: "fit".to_string(),
                    style: SeriesStyle::Lines,
                    points: vec![(d(1), 12.0), (d(5), 50.0)],
                },
            ],
        };

        let plot = chart_lines(&chart).unwrap();
        assert_eq!(plot.start, d(1));
        assert_eq!(plot.x_bounds, [0.0, 4.0]);
        assert_eq!(plot.lines[0].rgb, OBSERVED_RGB);
        assert_eq!(plot.lines[0].points, vec![(0.0, 10.0), (2.0, 30.0)]);
        assert_eq!(plot.lines[1].rgb, CURVE_RGB[0]);
        assert!(plot.y_bounds[0] < 10.0 && plot.y_bounds[1] > 50.0);
    }
}

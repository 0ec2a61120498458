//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed counts: `o`
//! - model curves: one glyph per curve (`-`, `*`, `+`, `~`, `=`), listed in the legend

use chrono::NaiveDate;

use crate::chart::{ChartRenderer, ChartRequest, SeriesStyle};
use crate::error::AppError;

const MARKER_GLYPH: char = 'o';
const CURVE_GLYPHS: [char; 5] = ['-', '*', '+', '~', '='];

/// Prints the chart to stdout.
#[derive(Debug, Clone, Copy)]
pub struct AsciiRenderer {
    pub width: usize,
    pub height: usize,
}

impl ChartRenderer for AsciiRenderer {
    fn render(&self, chart: &ChartRequest) -> Result<(), AppError> {
        println!("{}", render_ascii_chart(chart, self.width, self.height));
        Ok(())
    }
}

/// Render the chart into a string grid with a header and a legend.
pub fn render_ascii_chart(chart: &ChartRequest, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((d_min, d_max)) = chart.date_range() else {
        return format!("Plot: {} (no data)\n", chart.title);
    };
    let t_max = ((d_max - d_min).num_days() as f64).max(1.0);

    let (y_min, y_max) = chart.value_range().unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let mut legend = Vec::with_capacity(chart.series.len());

    // Draw curves first (so observed points can overlay).
    let mut glyphs = CURVE_GLYPHS.iter().copied().cycle();
    for series in chart.series.iter().filter(|s| s.style == SeriesStyle::Lines) {
        let glyph = glyphs.next().unwrap_or('-');
        let cells: Vec<(usize, usize)> = series
            .points
            .iter()
            .map(|&(d, y)| {
                (
                    map_x(day_offset(d, d_min), t_max, width),
                    map_y(y, y_min, y_max, height),
                )
            })
            .collect();
        draw_polyline(&mut grid, &cells, glyph);
        legend.push((glyph, series.name.as_str()));
    }

    for series in chart.series.iter().filter(|s| s.style == SeriesStyle::Markers) {
        for &(d, y) in &series.points {
            let x = map_x(day_offset(d, d_min), t_max, width);
            grid[map_y(y, y_min, y_max, height)][x] = MARKER_GLYPH;
        }
        legend.insert(0, (MARKER_GLYPH, series.name.as_str()));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x=[{d_min}, {d_max}] | y=[{y_min:.2}, {y_max:.2}]\n",
        chart.title
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (glyph, name) in legend {
        out.push_str(&format!("  {glyph} {name}\n"));
    }

    out
}

fn day_offset(date: NaiveDate, start: NaiveDate) -> f64 {
    (date - start).num_days() as f64
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], cells: &[(usize, usize)], glyph: char) {
    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in cells {
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, glyph),
            None => {
                if grid[y][x] == ' ' {
                    grid[y][x] = glyph;
                }
            }
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites a non-blank cell.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AxisType, OBSERVED_LABEL, PlotSeries};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    fn observed(points: Vec<(NaiveDate, f64)>) -> PlotSeries {
        PlotSeries {
            name: OBSERVED_LABEL.to_string(),
            style: SeriesStyle::Markers,
            points,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let chart = ChartRequest {
            title: "Test".to_string(),
            x_axis: AxisType::Date,
            series: vec![observed(vec![(d(1), 0.0), (d(10), 10.0)])],
        };

        let txt = render_ascii_chart(&chart, 10, 5);
        let expected = concat!(
            "Plot: Test | x=[2020-03-01, 2020-03-10] | y=[-0.50, 10.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o         \n",
            "  o Confirmed cases\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn curves_get_distinct_glyphs_and_legend_entries() {
        let chart = ChartRequest {
            title: "Test".to_string(),
            x_axis: AxisType::Date,
            series: vec![
                observed(vec![(d(1), 0.0)]),
                PlotSeries {
                    name: "Linear".to_string(),
                    style: SeriesStyle::Lines,
                    points: vec![(d(1), 0.0), (d(20), 20.0)],
                },
                PlotSeries {
                    name: "Logistic".to_string(),
                    style: SeriesStyle::Lines,
                    points: vec![(d(1), 20.0), (d(20), 20.0)],
                },
            ],
        };

        let txt = render_ascii_chart(&chart, 20, 8);
        assert!(txt.contains("  o Confirmed cases\n  - Linear\n  * Logistic\n"));
        let rows: String = txt.lines().skip(1).take(8).collect();
        assert!(rows.contains('-'));
        assert!(rows.contains('*'));
    }

    #[test]
    fn empty_chart_is_reported() {
        let chart = ChartRequest {
            title: "Nowhere".to_string(),
            x_axis: AxisType::Date,
            series: vec![observed(Vec::new())],
        };
        assert_eq!(render_ascii_chart(&chart, 10, 5), "Plot: Nowhere (no data)\n");
    }
}

//! Ratatui-based terminal UI.
//!
//! Shows the run report next to a chart of the observed counts and model
//! curves. Left/Right change the forecast horizon and re-run the pipeline; the
//! report pane scrolls with Up/Down.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{Modeler, RunOutput, modeler_from_config};
use crate::domain::{EntityContext, RunConfig};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::chart_lines;

/// Longest forecast horizon reachable with the arrow keys.
const MAX_PREDICT_LEN: usize = 90;

/// Start the TUI.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    // Load data and fit once before taking over the terminal so that source
    // errors print like any other CLI error.
    let mut app = App::new(&config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    modeler: Modeler,
    context: EntityContext,
    run: RunOutput,
    scroll: u16,
    status: String,
}

impl App {
    fn new(config: &RunConfig) -> Result<Self, AppError> {
        let modeler = modeler_from_config(config)?;
        let context = EntityContext {
            name: config.country.clone(),
            predict_len: config.predict_len,
        };
        let run = modeler.process(&context)?;
        Ok(Self {
            modeler,
            context,
            run,
            scroll: 0,
            status: "Ready.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => self.set_predict_len(self.context.predict_len.saturating_sub(1)),
            KeyCode::Right => self.set_predict_len((self.context.predict_len + 1).min(MAX_PREDICT_LEN)),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('r') => self.reprocess(),
            _ => {}
        }
        false
    }

    fn set_predict_len(&mut self, predict_len: usize) {
        if predict_len == self.context.predict_len {
            return;
        }
        self.context.predict_len = predict_len;
        self.reprocess();
    }

    fn reprocess(&mut self) {
        match self.modeler.process(&self.context) {
            Ok(run) => {
                self.run = run;
                self.status = format!("predict_len: {}", self.context.predict_len);
            }
            Err(err) => {
                self.status = format!("Run failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let best = self
            .run
            .best
            .as_ref()
            .map(|b| format!("{} (R2 = {:.4})", b.label, b.score))
            .unwrap_or_else(|| "-".to_string());
        let last = self
            .run
            .series
            .dates()
            .last()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("modeler", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.context.name)),
            ]),
            Line::from(Span::styled(
                format!(
                    "observations: {} (to {last}) | predict_len: {} | best: {best}",
                    self.run.series.len(),
                    self.context.predict_len,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let report = Paragraph::new(self.run.report.as_str())
            .block(Block::default().title("Report").borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(report, chunks[0]);

        self.draw_chart(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.run.chart.title.as_str())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(widget) = chart_lines(&self.run.chart) else {
            let msg = Paragraph::new("No data to plot.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let legend_height = widget.lines.len().min(6) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
            .split(inner);

        let legend: Vec<Line> = self
            .run
            .chart
            .series
            .iter()
            .zip(widget.lines.iter())
            .map(|(s, l)| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(Color::Rgb(l.rgb.0, l.rgb.1, l.rgb.2))),
                    Span::raw(s.name.as_str()),
                ])
            })
            .collect();

        let (start, x_bounds, y_bounds) = (widget.start, widget.x_bounds, widget.y_bounds);
        let (chart_rect, insets) = chart_layout(chunks[0]);
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, chunks[0], chart_rect, insets, start, x_bounds, y_bounds);
        }

        frame.render_widget(Paragraph::new(Text::from(legend)), chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ forecast days  ↑/↓ scroll report  r re-run  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    start: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_tick_date(start, x_val);
        let label_len = label.len() as u16;
        let start_col = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start_col,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_tick_count(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start_col = x.saturating_sub(label_len);
        if start_col < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start_col,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let y_label = Paragraph::new("cases").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

fn fmt_tick_date(start: NaiveDate, offset: f64) -> String {
    (start + chrono::Duration::days(offset.round() as i64))
        .format("%m-%d")
        .to_string()
}

/// Compact count label: 950, 12.5k, 3.1M.
fn fmt_tick_count(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e4 {
        format!("{:.1}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

//! Command-line parsing for the case-growth modeler.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartKind, ModelSpec, SourceKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "modeler", version, about = "Case-count growth analysis and model fitting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze one country: growth statistics, model fits, best model, chart.
    Report(ReportArgs),
    /// Interactive terminal viewer for the same run.
    ///
    /// Left/Right change the forecast horizon and re-run the pipeline.
    Tui(ReportArgs),
    /// List the country names the data source knows.
    Countries(SourceArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
}

/// Where the case series comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Data source.
    #[arg(long, value_enum, default_value_t = SourceKind::Jhu)]
    pub source: SourceKind,

    /// JHU-formatted CSV for `--source file` (default: $MODELER_DATA_FILE).
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Download URL for `--source jhu` (default: $MODELER_DATA_URL or the JHU CSSE repository).
    #[arg(long)]
    pub url: Option<String>,

    /// Random seed for `--source sample`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for a single-country run.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Country to analyze (case-insensitive).
    #[arg(short = 'c', long)]
    pub country: String,

    /// Days to forecast past the last observation.
    #[arg(long, default_value_t = 7)]
    pub predict_len: usize,

    /// Models to fit, in report order.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = vec![ModelSpec::Linear, ModelSpec::Logistic, ModelSpec::Exponential]
    )]
    pub models: Vec<ModelSpec>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Drop leading days with fewer cumulative cases than this (default: keep every day).
    #[arg(long)]
    pub min_cases: Option<f64>,

    /// Fit the models concurrently.
    #[arg(long)]
    pub parallel: bool,

    /// Chart output after the report.
    #[arg(long, value_enum, default_value_t = ChartKind::Ascii)]
    pub chart: ChartKind,

    /// Output path for `--chart svg`.
    #[arg(long, default_value = "chart.svg")]
    pub svg_out: PathBuf,

    /// ASCII chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the chart (observed series + model curves) to JSON.
    #[arg(long = "export-chart", value_name = "JSON")]
    pub export_chart: Option<PathBuf>,
}

/// Options for plotting a saved chart.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Chart JSON file produced by `modeler report --export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Write an SVG here instead of printing an ASCII chart.
    #[arg(long)]
    pub svg_out: Option<PathBuf>,

    /// ASCII chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults() {
        let cli = Cli::parse_from(["modeler", "report", "-c", "Spain"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.country, "Spain");
        assert_eq!(args.predict_len, 7);
        assert_eq!(args.models, ModelSpec::ALL.to_vec());
        assert_eq!(args.source.source, SourceKind::Jhu);
        assert_eq!(args.chart, ChartKind::Ascii);
        assert!(!args.parallel);
        assert_eq!(args.min_cases, None);
    }

    #[test]
    fn models_accept_comma_list() {
        let cli = Cli::parse_from([
            "modeler", "report", "-c", "Chile", "--models", "exponential,linear", "--source", "sample",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.models, vec![ModelSpec::Exponential, ModelSpec::Linear]);
        assert_eq!(args.source.source, SourceKind::Sample);
    }
}

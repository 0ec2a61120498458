//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging and `.env` configuration
//! - runs the growth/fit pipeline for one country
//! - prints the report and renders the chart
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::chart::{AsciiRenderer, ChartRenderer, ChartRequest, SvgRenderer};
use crate::cli::{Command, PlotArgs, ReportArgs, SourceArgs};
use crate::data::provider_from_config;
use crate::domain::{ChartKind, EntityContext, RunConfig, SourceConfig};
use crate::error::AppError;
use crate::models::ModelRegistry;

pub mod pipeline;

pub use pipeline::{Modeler, RunOutput};

/// Pixel size of SVG charts.
pub const SVG_SIZE: (u32, u32) = (1024, 640);

/// Entry point for the `modeler` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `modeler Spain` and `modeler -c Spain ...` should behave like `modeler report ...`.
    //
    // Clap requires a subcommand name, so we rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal, so it stays silent unless RUST_LOG asks otherwise.
    let default_filter = match cli.command {
        Command::Tui(_) => "off",
        _ => "warn",
    };
    init_logging(default_filter);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Tui(args) => crate::tui::run(run_config_from_args(&args)),
        Command::Countries(args) => handle_countries(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Log to stderr so stdout carries only the report and chart.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let modeler = modeler_from_config(&config)?;
    let run = modeler.process(&EntityContext {
        name: config.country.clone(),
        predict_len: config.predict_len,
    })?;

    print!("{}", run.report);

    render_chart(&run.chart, &config)?;

    if let Some(path) = &config.export_chart {
        crate::chart::write_chart_json(path, &run.chart)?;
    }

    Ok(())
}

fn handle_countries(args: SourceArgs) -> Result<(), AppError> {
    let provider = provider_from_config(&source_config_from_args(&args))?;
    for name in provider.entities()? {
        println!("{name}");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::chart::read_chart_json(&args.chart)?;
    match args.svg_out {
        Some(path) => SvgRenderer {
            path,
            width: SVG_SIZE.0,
            height: SVG_SIZE.1,
        }
        .render(&chart),
        None => AsciiRenderer {
            width: args.width,
            height: args.height,
        }
        .render(&chart),
    }
}

fn render_chart(chart: &ChartRequest, config: &RunConfig) -> Result<(), AppError> {
    let renderer: Box<dyn ChartRenderer> = match config.chart {
        ChartKind::Ascii => Box::new(AsciiRenderer {
            width: config.width,
            height: config.height,
        }),
        ChartKind::Svg => Box::new(SvgRenderer {
            path: config.svg_out.clone(),
            width: SVG_SIZE.0,
            height: SVG_SIZE.1,
        }),
        ChartKind::None => return Ok(()),
    };
    println!();
    renderer.render(chart)
}

/// Build a [`Modeler`] (provider + registry) for a run configuration.
pub fn modeler_from_config(config: &RunConfig) -> Result<Modeler, AppError> {
    if config.models.is_empty() {
        return Err(AppError::usage("At least one model is required (--models)."));
    }
    if config.min_cases.is_some_and(|m| !m.is_finite() || m < 0.0) {
        return Err(AppError::usage("--min-cases must be a non-negative number."));
    }

    let provider = provider_from_config(&config.source)?;
    let registry = ModelRegistry::from_specs(&config.models);
    let modeler = Modeler::new(provider, registry).with_parallel(config.parallel);
    Ok(match config.min_cases {
        Some(min_cases) => modeler.with_min_cases(min_cases),
        None => modeler,
    })
}

pub fn source_config_from_args(args: &SourceArgs) -> SourceConfig {
    SourceConfig {
        kind: args.source,
        file: args.file.clone(),
        url: args.url.clone(),
        seed: args.seed,
    }
}

pub fn run_config_from_args(args: &ReportArgs) -> RunConfig {
    RunConfig {
        country: args.country.clone(),
        predict_len: args.predict_len,
        models: args.models.clone(),
        source: source_config_from_args(&args.source),
        min_cases: args.min_cases,
        parallel: args.parallel,
        chart: args.chart,
        svg_out: args.svg_out.clone(),
        width: args.width,
        height: args.height,
        export_chart: args.export_chart.clone(),
    }
}

/// Rewrite argv so a bare country or bare flags mean `report`.
///
/// Rules:
/// - `modeler`                         -> unchanged (clap prints usage)
/// - `modeler Spain ...`               -> `modeler report -c Spain ...`
/// - `modeler -c Spain ...`            -> `modeler report -c Spain ...`
/// - `modeler --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "tui" | "countries" | "plot");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "report".to_string());
    } else {
        argv.splice(1..1, ["report".to_string(), "-c".to_string()]);
    }
    argv
}

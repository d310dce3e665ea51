//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports/charts
//! - writes report files and optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RunArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::io::export::RunSummary;

pub mod pipeline;

/// Entry point for the `salescope` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Segment(args) => handle_segment(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging() {
    // Stage diagnostics go to stderr so report output on stdout stays
    // machine-consumable.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("salescope=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run));

    if let Some(insights) = &run.insights {
        println!("{}", insights.product_strategy);
        println!("{}", insights.customer_retention);
        println!("{}", insights.operational_efficiency);

        crate::io::report_files::write_insight_files(&config.output_dir, insights)?;
        crate::io::report_files::write_advisory_files(&config.output_dir)?;
    }

    if let Some(segmentation) = &run.segmentation {
        println!("{}", crate::report::format_segments(segmentation));
    }

    if config.plot {
        print_charts(&run, &config);
    }

    write_exports(&run, &config)?;

    Ok(())
}

fn handle_segment(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    match &run.segmentation {
        Some(segmentation) => {
            println!("{}", crate::report::format_segments(segmentation));
        }
        None => {
            for (stage, err) in &run.failures {
                eprintln!("(stage {stage}) {err}");
            }
        }
    }

    write_exports(&run, &config)?;

    Ok(())
}

fn handle_plot(args: RunArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;
    print_charts(&run, &config);
    Ok(())
}

fn print_charts(run: &pipeline::RunOutput, config: &AnalysisConfig) {
    if let Some(overview) = &run.overview {
        println!(
            "{}",
            crate::plot::render_value_bars(
                "Total Value by Category",
                &overview.by_category,
                config.plot_width,
            )
        );
    }
    if let Some(trend) = &run.trend {
        println!(
            "{}",
            crate::plot::render_trend_line(
                "Sales Trends Over Time",
                &trend.by_period,
                config.plot_width,
                config.plot_height,
            )
        );
    }
}

fn write_exports(run: &pipeline::RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    if let (Some(path), Some(segmentation)) = (&config.export_segments, &run.segmentation) {
        crate::io::export::write_segments_csv(path, segmentation)?;
    }
    if let Some(path) = &config.export_summary {
        let summary = RunSummary {
            tool: "salescope",
            rows_read: run.rows_read,
            rows_analyzed: run.rows_analyzed,
            overview: run.overview.as_ref().map(|o| &o.stats),
            trend: run.trend.as_ref().map(|t| &t.stats),
            segmentation: run.segmentation.as_ref().map(|s| &s.stats),
        };
        crate::io::export::write_summary_json(path, &summary)?;
    }
    Ok(())
}

pub fn analysis_config_from_args(args: &RunArgs) -> AnalysisConfig {
    AnalysisConfig {
        csv_path: args.input.clone(),
        output_dir: args.output_dir.clone(),
        retention_months: args.retention_months,
        top_periods: args.top_periods,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_segments: args.export_segments.clone(),
        export_summary: args.export_summary.clone(),
    }
}

//! Command-line parsing for the sales analysis pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salescope", version, about = "Sales dataset analysis and strategic insights")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: clean, aggregate, segment, write reports, plot.
    Run(RunArgs),
    /// Print the customer segmentation table only (useful for scripting).
    Segment(RunArgs),
    /// Render the category and trend charts only, without writing report files.
    Plot(RunArgs),
}

/// Common options for all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Path to the sales transactions CSV.
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    /// Directory under which report files are written.
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Retention lookback window in calendar months.
    #[arg(long, default_value_t = 3)]
    pub retention_months: u32,

    /// How many peak periods to list in the operational-efficiency section.
    #[arg(long, default_value_t = 3)]
    pub top_periods: usize,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,

    /// Export the segmentation table to CSV.
    #[arg(long = "export-segments", value_name = "CSV")]
    pub export_segments: Option<PathBuf>,

    /// Export all stage statistics to JSON.
    #[arg(long = "export-summary", value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

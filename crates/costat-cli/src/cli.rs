//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "costat",
    version,
    about = "Merge county public-health reports into shapefile attribute tables",
    long_about = "Process periodically published county-level case/testing CSV reports\n\
                  into derived shapefiles: one output dataset per report, sharing the\n\
                  base county geometry with the report's statistics appended to the\n\
                  attribute table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process a directory of report CSVs into derived shapefiles.
    Process(ProcessArgs),

    /// List the attribute fields appended to every output dataset.
    Fields,
}

#[derive(Parser)]
pub struct ProcessArgs {
    /// Directory containing the downloaded report CSV files.
    #[arg(value_name = "REPORTS_DIR")]
    pub reports_dir: PathBuf,

    /// Path to the base county shapefile (any member file or bare stem).
    #[arg(long = "base", value_name = "SHAPEFILE")]
    pub base: PathBuf,

    /// Output directory for derived shapefiles (default: <REPORTS_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Trigger a remote report download before processing.
    ///
    /// The remote source client is not part of this tool; the flag is
    /// accepted for interface compatibility and logs a warning.
    #[arg(long = "download")]
    pub download: bool,

    /// Parse and merge without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

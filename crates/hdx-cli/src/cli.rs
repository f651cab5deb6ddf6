//! CLI argument definitions for the `hdx` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hdx",
    version,
    about = "Humanitarian data integration - clean, enrich and unify county-level sources",
    long_about = "Canonicalize heterogeneous humanitarian CSV and workbook sources,\n\
                  resolve country codes and build one unified county + national table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Write the run summary as JSON.
    #[arg(long = "summary-json", value_name = "PATH", global = true)]
    pub summary_json: Option<PathBuf>,

    /// Standards directory (default: $HDX_STANDARDS_DIR or the bundled one).
    #[arg(long = "standards", value_name = "DIR", global = true)]
    pub standards: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Canonicalize every CSV in a data directory into clean copies.
    Clean(CleanArgs),

    /// Prefix demographic rows with resolved ISO alpha-3 codes.
    Enrich(EnrichArgs),

    /// Join all sources into the unified county + national table.
    Build(BuildArgs),

    /// Run clean, enrich and build in sequence.
    Run(BuildArgs),

    /// List the source descriptor catalog.
    Sources,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Directory holding the raw sources.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Output directory for clean copies (default: <DATA_DIR>/clean).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Demographic source file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Enriched output file (default: demographic_data_iso.csv next to INPUT).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep rows whose country could not be resolved, with an empty iso3.
    #[arg(long = "keep-unresolved")]
    pub keep_unresolved: bool,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Directory holding the raw sources and their clean copies.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Unified output file (default: <DATA_DIR>/unified_information.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Country risk context file (default: searched next to the sources).
    #[arg(long = "risk-context", value_name = "PATH")]
    pub risk_context: Option<PathBuf>,
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

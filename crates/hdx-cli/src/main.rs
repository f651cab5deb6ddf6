//! `hdx` command-line entry point.

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use hdx_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use hdx_cli::commands::{
    load_standards, run_build, run_clean, run_enrich, run_pipeline, write_summary_json,
};
use hdx_cli::logging::{LogConfig, LogFormat, init_logging};
use hdx_cli::summary::{
    print_build_summary, print_clean_summary, print_enrich_summary, print_run_summary,
    print_sources,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match execute(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn execute(cli: &Cli) -> Result<()> {
    let standards = load_standards(cli.standards.as_deref())?;
    let summary_json = cli.summary_json.as_deref();
    match &cli.command {
        Command::Clean(args) => {
            let result = run_clean(args, &standards)?;
            print_clean_summary(&result);
            emit_json(summary_json, &result)
        }
        Command::Enrich(args) => {
            let result = run_enrich(args, &standards)?;
            print_enrich_summary(&result);
            emit_json(summary_json, &result)
        }
        Command::Build(args) => {
            let result = run_build(args, &standards)?;
            print_build_summary(&result);
            emit_json(summary_json, &result)
        }
        Command::Run(args) => {
            let result = run_pipeline(args, &standards)?;
            print_run_summary(&result);
            emit_json(summary_json, &result)
        }
        Command::Sources => {
            print_sources(&standards.catalog);
            Ok(())
        }
    }
}

fn emit_json<T: Serialize>(path: Option<&Path>, summary: &T) -> Result<()> {
    match path {
        Some(path) => write_summary_json(path, summary),
        None => Ok(()),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

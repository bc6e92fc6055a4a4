//! taxtab command line entry point.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use taxtab_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use taxtab_cli::commands::{run_merge, run_profilers, run_standardise};
use taxtab_cli::logging::{LogConfig, LogFormat, init_logging};
use taxtab_cli::pipeline::UsageError;
use taxtab_cli::summary::{print_merge_summary, print_standardise_summary};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialise logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Merge(args) => match run_merge(&args) {
            Ok(report) => {
                print_merge_summary(&report);
                0
            }
            Err(error) => exit_code_for(&error),
        },
        Command::Standardise(args) => match run_standardise(&args) {
            Ok(report) => {
                print_standardise_summary(&report);
                0
            }
            Err(error) => exit_code_for(&error),
        },
        Command::Profilers => {
            run_profilers();
            0
        }
    };
    std::process::exit(exit_code);
}

/// Print the error chain and choose the exit code: 2 for configuration
/// problems, 1 for failing runs.
fn exit_code_for(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    if error.downcast_ref::<UsageError>().is_some() {
        2
    } else {
        1
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

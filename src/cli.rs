// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `tasking`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tasking",
    version,
    about = "Run shell commands as a dependency-gated task graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task file (TOML).
    ///
    /// Default: `Tasking.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Maximum number of tasks running at once.
    ///
    /// Overrides `[config].concurrency`; defaults to the number of CPUs.
    #[arg(long, short = 'j', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKING_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task graph, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

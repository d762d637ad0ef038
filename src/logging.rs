// src/logging.rs

//! Tracing subscriber setup for the `tasking` binary.
//!
//! `--log-level` wins over `TASKING_LOG`, which takes full `EnvFilter`
//! directives (`debug`, `tasking::engine=trace,warn`, ...). Anything
//! unparsable falls back to `info`. Output goes to stderr; stdout is reserved
//! for the run summary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "TASKING_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_directives = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_directives.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Filter for a CLI level and the raw value of [`LOG_ENV_VAR`].
pub fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }

    env_directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

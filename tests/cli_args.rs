// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;
use tasking::cli::{CliArgs, LogLevel};
use tasking::config::default_config_path;

#[test]
fn defaults_to_task_file_in_working_directory() {
    let args = CliArgs::try_parse_from(["tasking"]).unwrap();

    assert_eq!(args.config, default_config_path());
    assert_eq!(args.config, PathBuf::from("Tasking.toml"));
    assert_eq!(args.concurrency, None);
    assert!(args.log_level.is_none());
    assert!(!args.dry_run);
}

#[test]
fn parses_overrides() {
    let args = CliArgs::try_parse_from([
        "tasking",
        "--config",
        "ci/tasks.toml",
        "-j",
        "3",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();

    assert_eq!(args.config, PathBuf::from("ci/tasks.toml"));
    assert_eq!(args.concurrency, Some(3));
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
}

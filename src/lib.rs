// src/lib.rs

//! Dependency-aware async task scheduler.
//!
//! Register tasks on a [`TaskGraph`], each depending on earlier tasks
//! finishing [`Fulfilled`](DependencyKind::Fulfilled),
//! [`Rejected`](DependencyKind::Rejected) or either way
//! ([`Settled`](DependencyKind::Settled)), then [`run`](TaskGraph::run) the
//! graph under a concurrency cap:
//!
//! ```no_run
//! use tasking::{DependsOn, RunOptions, TaskGraph};
//!
//! # async fn demo() -> tasking::errors::Result<()> {
//! let mut graph: TaskGraph<String, String> = TaskGraph::new();
//! graph
//!     .register("fetch", |_| async { Err("offline".to_string()) }, DependsOn::none())?
//!     .register("use_cache", |_| async { Ok("cached".to_string()) }, DependsOn::none().rejected("fetch"))?;
//!
//! let outcomes = graph.run(RunOptions::new(2)?).await?;
//! assert_eq!(outcomes.fulfilled("use_cache").map(String::as_str), Some("cached"));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod outcome;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::exec::{CommandFailure, CommandOutput, ShellCommand};
use crate::types::OutcomeKind;

pub use crate::dag::{DependsOn, TaskGraph};
pub use crate::engine::RunOptions;
pub use crate::outcome::{Outcome, Outcomes, TaskPanic};
pub use crate::types::{DependencyKind, TaskKey};

/// Graph of shell commands built from a config file.
pub type CommandGraph = TaskGraph<CommandOutput, CommandFailure>;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the task file, builds the command graph, runs it and
/// prints a per-task summary. Returns `false` if any task was rejected.
pub async fn run(args: CliArgs) -> Result<bool> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(true);
    }

    let options = cfg.run_options(args.concurrency)?;
    let graph = graph_from_config(&cfg)?;

    info!(
        tasks = graph.len(),
        concurrency = options.concurrency.get(),
        config = %config_path.display(),
        "running task file"
    );

    let outcomes = graph.run(options).await?;
    print!("{}", render_summary(&graph, &outcomes));

    Ok(outcomes.count(OutcomeKind::Rejected) == 0)
}

/// Register every task of a validated config, parents first.
pub fn graph_from_config(cfg: &ConfigFile) -> crate::errors::Result<CommandGraph> {
    let mut graph = CommandGraph::new();

    for (name, task) in cfg.tasks_in_order() {
        let depends_on: DependsOn = task
            .depends_on
            .iter()
            .map(|(dep, kind)| (dep.as_str(), *kind))
            .collect();
        graph.register_executor(name, ShellCommand::new(name, task.cmd.clone()), depends_on)?;
    }

    Ok(graph)
}

/// One line per registered task: `fulfilled`, `rejected (<reason>)`, or
/// `skipped` for tasks that never became eligible.
pub fn render_summary(
    graph: &CommandGraph,
    outcomes: &Outcomes<CommandOutput, CommandFailure>,
) -> String {
    graph
        .keys()
        .map(|key| match outcomes.get(key) {
            Some(Outcome::Fulfilled { .. }) => format!("{key}: fulfilled\n"),
            Some(Outcome::Rejected { reason }) => format!("{key}: rejected ({reason})\n"),
            None => format!("{key}: skipped\n"),
        })
        .collect()
}

/// Simple dry-run output: print tasks, deps and commands in registration order.
fn print_dry_run(cfg: &ConfigFile) {
    println!("tasking dry-run");
    match cfg.config.concurrency {
        Some(n) => println!("  config.concurrency = {n}"),
        None => println!("  config.concurrency = (available CPUs)"),
    }
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.tasks_in_order() {
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
        for (dep, kind) in task.depends_on.iter() {
            println!("      depends_on: {dep} ({kind})");
        }
    }

    debug!("dry-run complete (no execution)");
}

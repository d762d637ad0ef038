// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`executor`] provides the `TaskExecutor` trait every registered task
//!   implements (async closures get it for free).
//! - [`task_runner`] runs a single started task on Tokio, captures panics,
//!   and reports the outcome back to the runner.
//! - [`command`] provides `ShellCommand`, the executor used for tasks
//!   loaded from a config file.

pub mod command;
pub mod executor;
pub mod task_runner;

pub use command::{CommandFailure, CommandOutput, ShellCommand};
pub use executor::{TaskExecutor, TaskFuture};

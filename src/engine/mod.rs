// src/engine/mod.rs

//! Execution engine for a task graph.
//!
//! The pure frontier/promotion state machine lives in
//! [`Scheduler`](crate::dag::Scheduler); this module is the async shell
//! around it:
//! - [`runner`] owns the main loop that starts tasks up to the concurrency
//!   cap and waits on the shared completion channel.
//! - task execution itself is delegated to
//!   [`exec::task_runner`](crate::exec::task_runner).

use std::num::NonZeroUsize;

use crate::dag::TaskId;
use crate::errors::{Result, TaskingError};
use crate::outcome::Outcome;

pub mod runner;

pub use runner::Runner;

/// Options for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on simultaneously started, not-yet-finished executors.
    pub concurrency: NonZeroUsize,
}

impl RunOptions {
    pub fn new(concurrency: usize) -> Result<Self> {
        NonZeroUsize::new(concurrency)
            .map(|concurrency| Self { concurrency })
            .ok_or(TaskingError::InvalidConcurrency(concurrency))
    }
}

impl Default for RunOptions {
    /// One slot per available CPU.
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .unwrap_or(NonZeroUsize::MIN);
        Self { concurrency }
    }
}

/// Events flowing from in-flight tasks back into the runner.
#[derive(Debug)]
pub enum RunnerEvent<T, E> {
    /// A task's executor finished (or panicked) with a concrete outcome.
    TaskCompleted { id: TaskId, outcome: Outcome<T, E> },
}

// src/exec/executor.rs

//! Pluggable task executor abstraction.
//!
//! The runner only ever talks to a `TaskExecutor`. Plain async closures get
//! an implementation for free; [`ShellCommand`](super::command::ShellCommand)
//! is the implementation the `tasking` binary uses for config files.

use std::future::Future;
use std::pin::Pin;

use crate::outcome::Outcomes;

/// Boxed future returned by an executor.
pub type TaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// A unit of asynchronous work registered under a task key.
///
/// `execute` receives a snapshot of every outcome recorded before the task
/// was started; all of the task's own dependencies are always present in it.
/// `Err` finishes the task as `Rejected`, `Ok` as `Fulfilled`.
pub trait TaskExecutor<T, E>: Send + Sync {
    fn execute(&self, outcomes: Outcomes<T, E>) -> TaskFuture<T, E>;
}

impl<T, E, F, Fut> TaskExecutor<T, E> for F
where
    F: Fn(Outcomes<T, E>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn execute(&self, outcomes: Outcomes<T, E>) -> TaskFuture<T, E> {
        Box::pin(self(outcomes))
    }
}

// src/dag/scheduler_step.rs

//! Step-by-step result types for the scheduler.

use std::fmt;
use std::sync::Arc;

use crate::dag::task_node::TaskId;
use crate::exec::TaskExecutor;
use crate::outcome::Outcomes;
use crate::types::{OutcomeKind, TaskKey};

/// A task the scheduler just moved to `Running`.
pub struct StartedTask<T, E> {
    pub id: TaskId,
    pub key: TaskKey,
    pub executor: Arc<dyn TaskExecutor<T, E>>,
    /// Outcomes recorded before this task started.
    pub outcomes: Outcomes<T, E>,
}

impl<T, E> fmt::Debug for StartedTask<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartedTask")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("finished_before_start", &self.outcomes.len())
            .finish_non_exhaustive()
    }
}

/// Structured result of handling a single completion.
///
/// Useful for tests that step the scheduler by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionStep {
    /// The task that finished and its outcome tag, or `None` if the
    /// completion was ignored.
    pub finished: Option<(TaskKey, OutcomeKind)>,
    /// Children that became eligible as a result, in the order they were
    /// queued.
    pub promoted: Vec<TaskKey>,
}

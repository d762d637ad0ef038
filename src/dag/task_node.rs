// src/dag/task_node.rs

//! Task nodes and per-run task state.

use std::fmt;
use std::sync::Arc;

use crate::exec::TaskExecutor;
use crate::types::{DependencyKind, TaskKey};

/// Dense index of a task inside its [`TaskGraph`](super::TaskGraph),
/// assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resolved dependency edge: `parent` must finish with an outcome that
/// satisfies `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub parent: TaskId,
    pub kind: DependencyKind,
}

/// Registered task. Immutable once registration of later tasks stops
/// extending `children`.
pub(crate) struct TaskNode<T, E> {
    pub key: TaskKey,
    pub executor: Arc<dyn TaskExecutor<T, E>>,
    pub dependencies: Vec<Dependency>,
    pub children: Vec<TaskId>,
}

impl<T, E> fmt::Debug for TaskNode<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNode")
            .field("key", &self.key)
            .field("dependencies", &self.dependencies)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Where a task is in its lifecycle during a run.
///
/// Tasks only move forward: `Pending -> Eligible -> Running -> Finished`.
/// A task whose dependencies are never jointly satisfied stays `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// Waiting on dependencies.
    Pending,
    /// Dependencies satisfied; queued in the frontier.
    Eligible,
    /// Executor started, outcome not yet recorded.
    Running,
    /// Outcome recorded.
    Finished,
}

// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::dag::depends_on::DependsOn;
use crate::dag::task_node::{Dependency, TaskId, TaskNode};
use crate::engine::{RunOptions, Runner};
use crate::errors::{Result, TaskingError};
use crate::exec::TaskExecutor;
use crate::outcome::{Outcomes, TaskPanic};
use crate::types::{DependencyKind, TaskKey};

/// Registry of tasks and their dependency edges.
///
/// Tasks can only depend on tasks registered before them, so the graph is
/// built strictly parents-first and can never contain a cycle.
pub struct TaskGraph<T, E> {
    nodes: Vec<TaskNode<T, E>>,
    index: HashMap<TaskKey, TaskId>,
}

impl<T, E> fmt::Debug for TaskGraph<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl<T, E> Default for TaskGraph<T, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T, E> TaskGraph<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async closure as task `key`.
    ///
    /// Every key in `depends_on` must already be registered. On error the
    /// graph is left exactly as it was.
    pub fn register<F, Fut>(
        &mut self,
        key: impl Into<TaskKey>,
        execute: F,
        depends_on: impl Into<DependsOn>,
    ) -> Result<&mut Self>
    where
        F: Fn(Outcomes<T, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: 'static,
        E: 'static,
    {
        self.insert(key.into(), Arc::new(execute), depends_on.into())
    }

    /// Register any [`TaskExecutor`] implementation as task `key`.
    pub fn register_executor<X>(
        &mut self,
        key: impl Into<TaskKey>,
        executor: X,
        depends_on: impl Into<DependsOn>,
    ) -> Result<&mut Self>
    where
        X: TaskExecutor<T, E> + 'static,
    {
        self.insert(key.into(), Arc::new(executor), depends_on.into())
    }

    fn insert(
        &mut self,
        key: TaskKey,
        executor: Arc<dyn TaskExecutor<T, E>>,
        depends_on: DependsOn,
    ) -> Result<&mut Self> {
        if self.index.contains_key(&key) {
            return Err(TaskingError::DuplicateTask(key));
        }

        // Resolve every edge before touching the graph.
        let dependencies = depends_on
            .iter()
            .map(|(parent, kind)| match self.index.get(parent) {
                Some(&parent) => Ok(Dependency { parent, kind }),
                None => Err(TaskingError::UnknownDependency {
                    task: key.clone(),
                    dependency: parent.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        let id = TaskId(self.nodes.len());
        for dep in &dependencies {
            self.nodes[dep.parent.0].children.push(id);
        }

        debug!(
            task = %key,
            deps = dependencies.len(),
            "registered task"
        );

        self.index.insert(key.clone(), id);
        self.nodes.push(TaskNode {
            key,
            executor,
            dependencies,
            children: Vec::new(),
        });

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn id_of(&self, key: &str) -> Option<TaskId> {
        self.index.get(key).copied()
    }

    pub fn key_of(&self, id: TaskId) -> &str {
        &self.nodes[id.0].key
    }

    /// Task keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }

    /// Tasks without dependencies, in registration order.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|n| n.dependencies.is_empty())
            .map(|n| n.key.as_str())
    }

    /// Declared dependencies of `key` as `(parent key, kind)` pairs.
    pub fn dependencies_of(&self, key: &str) -> Vec<(&str, DependencyKind)> {
        self.node(key)
            .map(|n| {
                n.dependencies
                    .iter()
                    .map(|d| (self.key_of(d.parent), d.kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tasks that declared a dependency on `key`, in registration order.
    pub fn dependents_of(&self, key: &str) -> Vec<&str> {
        self.node(key)
            .map(|n| n.children.iter().map(|&c| self.key_of(c)).collect())
            .unwrap_or_default()
    }

    fn node(&self, key: &str) -> Option<&TaskNode<T, E>> {
        self.index.get(key).map(|id| &self.nodes[id.0])
    }

    pub(crate) fn nodes(&self) -> &[TaskNode<T, E>] {
        &self.nodes
    }

    pub(crate) fn node_at(&self, id: TaskId) -> &TaskNode<T, E> {
        &self.nodes[id.0]
    }
}

impl<T, E> TaskGraph<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + From<TaskPanic> + Send + Sync + 'static,
{
    /// Execute the whole graph with at most `options.concurrency` executors
    /// in flight.
    ///
    /// Task failures never fail the run; they are recorded as `Rejected`.
    /// Tasks whose dependency requirements are never met are absent from the
    /// returned store.
    pub async fn run(&self, options: RunOptions) -> Result<Outcomes<T, E>> {
        Runner::new(self, options).run().await
    }
}

// src/outcome.rs

//! Task outcomes and the per-run outcome store.
//!
//! [`Outcomes`] is the only mutable state shared during a run. The runner
//! is its single writer; executors only ever see a snapshot taken at the
//! moment they were started.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::types::{OutcomeKind, TaskKey};

/// Tagged result of a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Fulfilled { value: T },
    Rejected { reason: E },
}

impl<T, E> Outcome<T, E> {
    pub fn fulfilled(value: T) -> Self {
        Outcome::Fulfilled { value }
    }

    pub fn rejected(reason: E) -> Self {
        Outcome::Rejected { reason }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Fulfilled { .. } => OutcomeKind::Fulfilled,
            Outcome::Rejected { .. } => OutcomeKind::Rejected,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled { value } => Some(value),
            Outcome::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&E> {
        match self {
            Outcome::Fulfilled { .. } => None,
            Outcome::Rejected { reason } => Some(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled { value },
            Err(reason) => Outcome::Rejected { reason },
        }
    }
}

/// Raised in place of a result when an executor panics.
///
/// Rejection reason types must be constructible from it so a panicking task
/// still finishes as `Rejected`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("task '{task}' panicked: {message}")]
pub struct TaskPanic {
    pub task: TaskKey,
    pub message: String,
}

impl From<TaskPanic> for String {
    fn from(panic: TaskPanic) -> Self {
        panic.to_string()
    }
}

/// Outcome store: finished task key -> outcome, ordered by key.
///
/// Cloning is cheap and produces a snapshot; later writes by the runner
/// copy the underlying map instead of mutating what a snapshot sees.
#[derive(Debug)]
pub struct Outcomes<T, E> {
    entries: Arc<BTreeMap<TaskKey, Outcome<T, E>>>,
}

impl<T, E> Clone for Outcomes<T, E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T, E> Default for Outcomes<T, E> {
    fn default() -> Self {
        Self {
            entries: Arc::new(BTreeMap::new()),
        }
    }
}

impl<T: PartialEq, E: PartialEq> PartialEq for Outcomes<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T, E> Outcomes<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Outcome<T, E>> {
        self.entries.get(key)
    }

    pub fn kind_of(&self, key: &str) -> Option<OutcomeKind> {
        self.entries.get(key).map(Outcome::kind)
    }

    /// Value of `key` if it finished `Fulfilled`.
    pub fn fulfilled(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(Outcome::value)
    }

    /// Reason of `key` if it finished `Rejected`.
    pub fn rejected(&self, key: &str) -> Option<&E> {
        self.entries.get(key).and_then(Outcome::reason)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TaskKey, Outcome<T, E>> {
        self.entries.iter()
    }

    /// Number of recorded outcomes with the given tag.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.entries.values().filter(|o| o.kind() == kind).count()
    }
}

impl<T: Clone, E: Clone> Outcomes<T, E> {
    /// Record the outcome of a finished task. Write-once per key.
    pub(crate) fn record(&mut self, key: TaskKey, outcome: Outcome<T, E>) {
        if self.entries.contains_key(&key) {
            warn!(task = %key, "outcome already recorded; ignoring second write");
            return;
        }
        Arc::make_mut(&mut self.entries).insert(key, outcome);
    }

    /// Unwrap into a plain map, cloning only if a snapshot is still alive.
    pub fn into_map(self) -> BTreeMap<TaskKey, Outcome<T, E>> {
        Arc::try_unwrap(self.entries).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl<T: Clone, E: Clone> FromIterator<(TaskKey, Outcome<T, E>)> for Outcomes<T, E> {
    fn from_iter<I: IntoIterator<Item = (TaskKey, Outcome<T, E>)>>(iter: I) -> Self {
        let mut outcomes = Outcomes::new();
        for (key, outcome) in iter {
            outcomes.record(key, outcome);
        }
        outcomes
    }
}

impl<'a, T, E> IntoIterator for &'a Outcomes<T, E> {
    type Item = (&'a TaskKey, &'a Outcome<T, E>);
    type IntoIter = btree_map::Iter<'a, TaskKey, Outcome<T, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// src/dag/depends_on.rs

use crate::types::{DependencyKind, TaskKey};

/// Dependency declaration passed to [`TaskGraph::register`](super::TaskGraph::register).
///
/// Keeps declaration order. Declaring the same key twice replaces the
/// earlier requirement in place.
///
/// ```
/// use tasking::{DependencyKind, DependsOn};
///
/// let deps = DependsOn::none()
///     .fulfilled("build")
///     .with("lint", None)
///     .with("docs", Some(DependencyKind::Settled));
/// assert_eq!(deps.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependsOn {
    entries: Vec<(TaskKey, DependencyKind)>,
}

impl DependsOn {
    /// No dependencies: the task is a root and starts in the initial frontier.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a requirement on `key`. A `None` kind is ignored.
    pub fn with(mut self, key: impl Into<TaskKey>, kind: impl Into<Option<DependencyKind>>) -> Self {
        let Some(kind) = kind.into() else {
            return self;
        };
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = kind,
            None => self.entries.push((key, kind)),
        }
        self
    }

    pub fn fulfilled(self, key: impl Into<TaskKey>) -> Self {
        self.with(key, DependencyKind::Fulfilled)
    }

    pub fn rejected(self, key: impl Into<TaskKey>) -> Self {
        self.with(key, DependencyKind::Rejected)
    }

    pub fn settled(self, key: impl Into<TaskKey>) -> Self {
        self.with(key, DependencyKind::Settled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DependencyKind)> {
        self.entries.iter().map(|(k, kind)| (k.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<TaskKey>> FromIterator<(K, DependencyKind)> for DependsOn {
    fn from_iter<I: IntoIterator<Item = (K, DependencyKind)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DependsOn::none(), |deps, (key, kind)| deps.with(key, kind))
    }
}

impl<K: Into<TaskKey>, const N: usize> From<[(K, DependencyKind); N]> for DependsOn {
    fn from(entries: [(K, DependencyKind); N]) -> Self {
        entries.into_iter().collect()
    }
}

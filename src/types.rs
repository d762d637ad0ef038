use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical task identifier type used throughout the crate.
pub type TaskKey = String;

/// Tag of a finished task's [`Outcome`](crate::outcome::Outcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Fulfilled,
    Rejected,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Fulfilled => f.write_str("fulfilled"),
            OutcomeKind::Rejected => f.write_str("rejected"),
        }
    }
}

/// Outcome a dependency edge requires from its parent task.
///
/// - `Fulfilled`: the parent must have succeeded.
/// - `Rejected`: the parent must have failed.
/// - `Settled`: the parent only has to finish, either way.
///
/// Config files name kinds case-insensitively; deserialization goes through
/// [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DependencyKind {
    Fulfilled,
    Rejected,
    Settled,
}

impl DependencyKind {
    /// Whether a parent that finished with `actual` satisfies this requirement.
    pub fn is_satisfied_by(self, actual: OutcomeKind) -> bool {
        match (self, actual) {
            (DependencyKind::Settled, _) => true,
            (DependencyKind::Fulfilled, OutcomeKind::Fulfilled) => true,
            (DependencyKind::Rejected, OutcomeKind::Rejected) => true,
            (DependencyKind::Fulfilled, OutcomeKind::Rejected) => false,
            (DependencyKind::Rejected, OutcomeKind::Fulfilled) => false,
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Fulfilled => f.write_str("fulfilled"),
            DependencyKind::Rejected => f.write_str("rejected"),
            DependencyKind::Settled => f.write_str("settled"),
        }
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fulfilled" => Ok(DependencyKind::Fulfilled),
            "rejected" => Ok(DependencyKind::Rejected),
            "settled" => Ok(DependencyKind::Settled),
            other => Err(format!(
                "invalid dependency kind: {other} (expected \"fulfilled\", \"rejected\" or \"settled\")"
            )),
        }
    }
}

impl TryFrom<String> for DependencyKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

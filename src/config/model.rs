// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::RunOptions;
use crate::errors::Result;
use crate::types::DependencyKind;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// concurrency = 2
///
/// [task.build]
/// cmd = "make"
///
/// [task.report]
/// cmd = "echo build failed"
/// depends_on = { build = "rejected" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of commands running at once. Must be >= 1.
    ///
    /// When absent, the CLI flag or the number of available CPUs is used.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskConfig {
    /// The shell command to execute.
    pub cmd: String,

    /// Tasks this one waits for, and the outcome each must finish with.
    #[serde(default)]
    pub depends_on: BTreeMap<String, DependencyKind>,
}

/// A validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, which guarantees that
/// every dependency exists and that the tasks form a DAG.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskConfig>,
    order: Vec<String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskConfig>,
        order: Vec<String>,
    ) -> Self {
        Self {
            config,
            task,
            order,
        }
    }

    /// Tasks in an order where every task comes after all of its
    /// dependencies.
    pub fn tasks_in_order(&self) -> impl Iterator<Item = (&str, &TaskConfig)> {
        self.order
            .iter()
            .filter_map(|name| self.task.get(name).map(|t| (name.as_str(), t)))
    }

    /// Run options, with `cli_concurrency` taking precedence over the file.
    pub fn run_options(&self, cli_concurrency: Option<usize>) -> Result<RunOptions> {
        match cli_concurrency.or(self.config.concurrency) {
            Some(n) => RunOptions::new(n),
            None => Ok(RunOptions::default()),
        }
    }
}

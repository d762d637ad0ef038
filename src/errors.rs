// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskKey;

#[derive(Error, Debug)]
pub enum TaskingError {
    #[error("Cannot depend on task \"{dependency}\" from \"{task}\", as it does not exist (unknown dependency)")]
    UnknownDependency { task: TaskKey, dependency: TaskKey },

    #[error("Task already registered: {0}")]
    DuplicateTask(TaskKey),

    #[error("Concurrency must be a positive integer (got {0})")]
    InvalidConcurrency(usize),

    #[error("Completion channel closed while tasks were still in flight")]
    CompletionChannelClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TaskingError>;

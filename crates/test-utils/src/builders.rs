#![allow(dead_code)]

use std::collections::BTreeMap;
use tasking::DependencyKind;
use tasking::config::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
use tasking::errors::Result;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.config.config.concurrency = Some(n);
        self
    }

    /// Validate without panicking, for tests that expect an error.
    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                depends_on: BTreeMap::new(),
            },
        }
    }

    pub fn depends_on(mut self, dep: &str, kind: DependencyKind) -> Self {
        self.task.depends_on.insert(dep.to_string(), kind);
        self
    }

    pub fn after(self, dep: &str) -> Self {
        self.depends_on(dep, DependencyKind::Fulfilled)
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskingError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskingError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let order = validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task, order))
    }
}

/// Validate and return the registration order.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<Vec<String>> {
    ensure_has_tasks(cfg)?;
    validate_global_config(cfg)?;
    validate_task_dependencies(cfg)?;
    registration_order(cfg)
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(TaskingError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.concurrency == Some(0) {
        return Err(TaskingError::ConfigError(
            "[config].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.depends_on.keys() {
            if dep == name {
                return Err(TaskingError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `depends_on`",
                    name
                )));
            }
            if !cfg.task.contains_key(dep) {
                return Err(TaskingError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `depends_on`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

/// Topologically sort the tasks so each is registered after its parents.
///
/// Edge direction: dep -> task. For
///   [task.B]
///   depends_on = { A = "fulfilled" }
/// we add edge A -> B.
fn registration_order(cfg: &RawConfigFile) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.depends_on.keys() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(TaskingError::DagCycle(format!(
            "cycle detected in task graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}

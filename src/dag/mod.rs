// src/dag/mod.rs

//! Task graph representation and scheduling.
//!
//! - [`graph`] holds the registry of tasks and their dependency edges.
//! - [`depends_on`] is the dependency declaration passed at registration.
//! - [`task_node`] provides node, edge and run-state types.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   tasks are eligible and promotes children as parents finish.
//! - [`scheduler_step`] defines the result types for scheduler steps.

pub mod depends_on;
pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod task_node;

pub use depends_on::DependsOn;
pub use graph::TaskGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::{CompletionStep, StartedTask};
pub use task_node::{Dependency, TaskId, TaskRunState};

// src/dag/scheduler.rs

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::scheduler_step::{CompletionStep, StartedTask};
use crate::dag::task_node::{TaskId, TaskRunState};
use crate::outcome::{Outcome, Outcomes};
use crate::types::{OutcomeKind, TaskKey};

/// Per-run state machine over an immutable [`TaskGraph`].
///
/// It is responsible for:
/// - keeping the FIFO frontier of eligible-but-not-started tasks
/// - tracking which tasks are in flight
/// - recording outcomes as tasks finish
/// - promoting children whose dependency requirements are now all met
///
/// It performs no IO and never touches Tokio; the async
/// [`Runner`](crate::engine::Runner) drives it.
#[derive(Debug)]
pub struct Scheduler<'g, T, E> {
    graph: &'g TaskGraph<T, E>,
    states: Vec<TaskRunState>,
    /// Outcome tag per finished task, indexed by `TaskId`.
    finished: Vec<Option<OutcomeKind>>,
    frontier: VecDeque<TaskId>,
    in_flight: HashSet<TaskId>,
    outcomes: Outcomes<T, E>,
}

impl<'g, T, E> Scheduler<'g, T, E> {
    /// Start a run: every task without dependencies is eligible, in
    /// registration order.
    pub fn new(graph: &'g TaskGraph<T, E>) -> Self {
        let mut states = vec![TaskRunState::Pending; graph.len()];
        let mut frontier = VecDeque::new();

        for (idx, node) in graph.nodes().iter().enumerate() {
            if node.dependencies.is_empty() {
                states[idx] = TaskRunState::Eligible;
                frontier.push_back(TaskId(idx));
            }
        }

        debug!(roots = frontier.len(), tasks = graph.len(), "scheduler: initial frontier");

        Self {
            graph,
            states,
            finished: vec![None; graph.len()],
            frontier,
            in_flight: HashSet::new(),
            outcomes: Outcomes::new(),
        }
    }

    /// Whether another task may be started under `concurrency`.
    pub fn has_capacity(&self, concurrency: usize) -> bool {
        self.in_flight.len() < concurrency && !self.frontier.is_empty()
    }

    /// The run is over once nothing is queued and nothing is in flight.
    /// Tasks still `Pending` at that point can never become eligible.
    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty() && self.in_flight.is_empty()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Read-only view of a task's state. `None` for unknown keys.
    pub fn run_state_of(&self, key: &str) -> Option<TaskRunState> {
        self.graph.id_of(key).map(|id| self.states[id.0])
    }

    /// Snapshot of everything finished so far.
    pub fn outcomes(&self) -> &Outcomes<T, E> {
        &self.outcomes
    }

    /// Tasks still `Pending`, in registration order.
    pub fn never_eligible(&self) -> Vec<TaskKey> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == TaskRunState::Pending)
            .map(|(idx, _)| self.graph.key_of(TaskId(idx)).to_string())
            .collect()
    }

    /// Pop the oldest eligible task and mark it `Running`.
    ///
    /// The returned [`StartedTask`] carries the executor and a snapshot of
    /// the outcome store as of this instant.
    pub fn start_next(&mut self) -> Option<StartedTask<T, E>> {
        let id = self.frontier.pop_front()?;
        let node = self.graph.node_at(id);

        self.states[id.0] = TaskRunState::Running;
        self.in_flight.insert(id);

        debug!(
            task = %node.key,
            in_flight = self.in_flight.len(),
            queued = self.frontier.len(),
            "scheduler: starting task"
        );

        Some(StartedTask {
            id,
            key: node.key.clone(),
            executor: Arc::clone(&node.executor),
            outcomes: self.outcomes.clone(),
        })
    }

    /// Whether every dependency of `id` has finished with an accepted outcome.
    fn deps_satisfied(&self, id: TaskId) -> bool {
        self.graph
            .node_at(id)
            .dependencies
            .iter()
            .all(|dep| match self.finished[dep.parent.0] {
                Some(actual) => dep.kind.is_satisfied_by(actual),
                None => false,
            })
    }
}

impl<'g, T: Clone, E: Clone> Scheduler<'g, T, E> {
    /// Record the outcome of an in-flight task and promote any children
    /// whose requirements are now all satisfied.
    ///
    /// Completions for tasks that are not in flight are ignored.
    pub fn complete(&mut self, id: TaskId, outcome: Outcome<T, E>) -> CompletionStep {
        if !self.in_flight.remove(&id) {
            warn!(
                task_id = id.0,
                "completion for task that is not in flight; ignoring"
            );
            return CompletionStep::default();
        }

        let node = self.graph.node_at(id);
        let kind = outcome.kind();

        self.states[id.0] = TaskRunState::Finished;
        self.finished[id.0] = Some(kind);
        self.outcomes.record(node.key.clone(), outcome);

        debug!(task = %node.key, outcome = %kind, "scheduler: task finished");

        let mut promoted = Vec::new();
        for &child in &node.children {
            if self.states[child.0] != TaskRunState::Pending || !self.deps_satisfied(child) {
                continue;
            }

            self.states[child.0] = TaskRunState::Eligible;
            self.frontier.push_back(child);

            let child_key = self.graph.key_of(child);
            debug!(
                task = %child_key,
                parent = %node.key,
                "dependencies satisfied; marking Eligible"
            );
            promoted.push(child_key.to_string());
        }

        CompletionStep {
            finished: Some((node.key.clone(), kind)),
            promoted,
        }
    }

    /// End the run and hand back the outcome store.
    pub fn into_outcomes(self) -> Outcomes<T, E> {
        self.outcomes
    }
}

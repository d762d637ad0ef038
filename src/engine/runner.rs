// src/engine/runner.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::{Scheduler, TaskGraph};
use crate::errors::{Result, TaskingError};
use crate::exec::task_runner::spawn_task;
use crate::outcome::{Outcomes, TaskPanic};
use crate::types::OutcomeKind;

use super::{RunOptions, RunnerEvent};

/// Drives a [`Scheduler`] to completion, running executors on Tokio.
///
/// This is the IO shell around the scheduler: it decides *when* to start
/// the next eligible task or wait, while the scheduler decides *which*
/// task and what becomes eligible next.
pub struct Runner<'g, T, E> {
    scheduler: Scheduler<'g, T, E>,
    options: RunOptions,
    event_tx: mpsc::Sender<RunnerEvent<T, E>>,
    event_rx: mpsc::Receiver<RunnerEvent<T, E>>,
}

impl<T, E> fmt::Debug for Runner<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("options", &self.options)
            .field("in_flight", &self.scheduler.in_flight_len())
            .field("queued", &self.scheduler.frontier_len())
            .finish_non_exhaustive()
    }
}

impl<'g, T, E> Runner<'g, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + From<TaskPanic> + Send + Sync + 'static,
{
    pub fn new(graph: &'g TaskGraph<T, E>, options: RunOptions) -> Self {
        // Every in-flight task sends exactly one event, so the cap bounds
        // the number of undelivered completions.
        let (event_tx, event_rx) = mpsc::channel(options.concurrency.get());
        Self {
            scheduler: Scheduler::new(graph),
            options,
            event_tx,
            event_rx,
        }
    }

    /// Main loop.
    ///
    /// - Start the next eligible task while under the concurrency cap.
    /// - Otherwise wait for exactly one completion, record it, and let the
    ///   scheduler promote children.
    /// - Stop once nothing is queued and nothing is in flight.
    pub async fn run(mut self) -> Result<Outcomes<T, E>> {
        let concurrency = self.options.concurrency.get();
        info!(concurrency, "task run started");

        let mut started = 0usize;

        while !self.scheduler.is_finished() {
            if self.scheduler.has_capacity(concurrency) {
                if let Some(task) = self.scheduler.start_next() {
                    started += 1;
                    spawn_task(task, self.event_tx.clone());
                    continue;
                }
            }

            let event = self
                .event_rx
                .recv()
                .await
                .ok_or(TaskingError::CompletionChannelClosed)?;

            match event {
                RunnerEvent::TaskCompleted { id, outcome } => {
                    let step = self.scheduler.complete(id, outcome);
                    if !step.promoted.is_empty() {
                        debug!(promoted = ?step.promoted, "newly eligible tasks");
                    }
                }
            }
        }

        let skipped = self.scheduler.never_eligible();
        let outcomes = self.scheduler.into_outcomes();

        info!(
            started,
            fulfilled = outcomes.count(OutcomeKind::Fulfilled),
            rejected = outcomes.count(OutcomeKind::Rejected),
            never_eligible = skipped.len(),
            "task run finished"
        );
        if !skipped.is_empty() {
            debug!(?skipped, "tasks whose dependency requirements were never met");
        }

        Ok(outcomes)
    }
}

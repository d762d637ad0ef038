// src/exec/task_runner.rs

//! Individual task runner.

use std::any::Any;

use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, error};

use crate::dag::StartedTask;
use crate::engine::RunnerEvent;
use crate::outcome::{Outcome, TaskPanic};

/// Run a started task on its own Tokio task and report exactly one
/// `TaskCompleted` event for it.
///
/// The executor runs inside a nested Tokio task so that a panic, whether
/// while building the future or while polling it, is captured as a
/// `Rejected` outcome instead of tearing down the run.
pub fn spawn_task<T, E>(task: StartedTask<T, E>, runner_tx: mpsc::Sender<RunnerEvent<T, E>>)
where
    T: Send + Sync + 'static,
    E: From<TaskPanic> + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let StartedTask {
            id,
            key,
            executor,
            outcomes,
        } = task;

        let handle = tokio::spawn(async move { executor.execute(outcomes).await });

        let outcome = match handle.await {
            Ok(result) => Outcome::from(result),
            Err(err) => {
                let message = join_error_message(err);
                error!(task = %key, error = %message, "task executor panicked");
                Outcome::Rejected {
                    reason: E::from(TaskPanic {
                        task: key.clone(),
                        message,
                    }),
                }
            }
        };

        debug!(task = %key, outcome = %outcome.kind(), "task runner finished");

        if runner_tx
            .send(RunnerEvent::TaskCompleted { id, outcome })
            .await
            .is_err()
        {
            debug!(task = %key, "runner no longer listening; dropping completion");
        }
    });
}

fn join_error_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        err.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

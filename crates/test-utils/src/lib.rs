//! Shared helpers for `tasking` integration tests.

pub mod builders;
pub mod probe;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tasking::logging::{LOG_ENV_VAR, build_filter};
use tasking::{Outcomes, RunOptions, TaskGraph, TaskPanic};

/// Upper bound for a single test body. Scheduler tests finish in
/// milliseconds, so hitting this means a run never terminated.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Route crate logs to the test writer, filtered by `TASKING_LOG` the same
/// way the binary filters them. Output shows up for failing tests only.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var(LOG_ENV_VAR).ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(build_filter(None, directives.as_deref()))
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, failing the test if it outlives [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}; a task run may be stuck"),
    }
}

/// Run `graph` with at most `cap` tasks in flight and return its outcomes.
pub async fn run_capped<T, E>(graph: &TaskGraph<T, E>, cap: usize) -> Outcomes<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + From<TaskPanic> + Send + Sync + 'static,
{
    let options = match RunOptions::new(cap) {
        Ok(options) => options,
        Err(err) => panic!("invalid cap {cap}: {err}"),
    };
    match graph.run(options).await {
        Ok(outcomes) => outcomes,
        Err(err) => panic!("task run failed: {err}"),
    }
}

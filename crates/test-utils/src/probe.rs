use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tasking::Outcomes;

/// Records how many executors are running at once, in which order they
/// started, and which outcomes each one could see when it started.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyProbe {
    inner: Arc<ProbeInner>,
}

#[derive(Debug, Default)]
struct ProbeInner {
    current: AtomicUsize,
    max: AtomicUsize,
    started: Mutex<Vec<String>>,
    seen: Mutex<BTreeMap<String, Vec<String>>>,
}

/// Decrements the probe's running count when dropped.
pub struct ProbeGuard {
    inner: Arc<ProbeInner>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.inner.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as running, remembering the outcome keys it received.
    pub fn enter<T, E>(&self, key: &str, outcomes: &Outcomes<T, E>) -> ProbeGuard {
        let now = self.inner.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max.fetch_max(now, Ordering::SeqCst);
        self.inner.started.lock().unwrap().push(key.to_string());
        self.inner
            .seen
            .lock()
            .unwrap()
            .insert(key.to_string(), outcomes.keys().map(str::to_string).collect());
        ProbeGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn current(&self) -> usize {
        self.inner.current.load(Ordering::SeqCst)
    }

    pub fn max(&self) -> usize {
        self.inner.max.load(Ordering::SeqCst)
    }

    /// Keys in the order their executors started.
    pub fn started(&self) -> Vec<String> {
        self.inner.started.lock().unwrap().clone()
    }

    /// Outcome keys visible to `key` when it started, if it started.
    pub fn seen_by(&self, key: &str) -> Option<Vec<String>> {
        self.inner.seen.lock().unwrap().get(key).cloned()
    }
}

pub type BoxedTaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Executor that registers with `probe`, sleeps for `delay_ms`, then
/// returns a clone of `result`.
pub fn delayed<T, E>(
    probe: &ConcurrencyProbe,
    key: &str,
    result: Result<T, E>,
    delay_ms: u64,
) -> impl Fn(Outcomes<T, E>) -> BoxedTaskFuture<T, E> + Send + Sync + 'static
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let probe = probe.clone();
    let key = key.to_string();
    move |outcomes: Outcomes<T, E>| -> BoxedTaskFuture<T, E> {
        let guard = probe.enter(&key, &outcomes);
        let result = result.clone();
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            drop(guard);
            result
        })
    }
}

/// Shorthand for a delayed executor that fulfils with `value`.
pub fn delayed_ok<T, E>(
    probe: &ConcurrencyProbe,
    key: &str,
    value: T,
    delay_ms: u64,
) -> impl Fn(Outcomes<T, E>) -> BoxedTaskFuture<T, E> + Send + Sync + 'static
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    delayed(probe, key, Ok(value), delay_ms)
}

/// Shorthand for a delayed executor that rejects with `reason`.
pub fn delayed_err<T, E>(
    probe: &ConcurrencyProbe,
    key: &str,
    reason: E,
    delay_ms: u64,
) -> impl Fn(Outcomes<T, E>) -> BoxedTaskFuture<T, E> + Send + Sync + 'static
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    delayed(probe, key, Err(reason), delay_ms)
}

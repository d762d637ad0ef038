// tests/task_graph_scenarios.rs

mod common;
use crate::common::{init_tracing, run_capped};
use crate::common::probe::{delayed_err, delayed_ok, BoxedTaskFuture, ConcurrencyProbe};

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tasking::errors::TaskingError;
use tasking::{DependencyKind, DependsOn, Outcome, Outcomes, TaskGraph};

type TestResult = Result<(), Box<dyn Error>>;
type Graph = TaskGraph<String, String>;
type Snapshot = Arc<Mutex<Option<Outcomes<String, String>>>>;

fn outcomes(entries: &[(&str, Outcome<String, String>)]) -> Outcomes<String, String> {
    entries
        .iter()
        .map(|(k, o)| (k.to_string(), o.clone()))
        .collect()
}

fn ok(v: &str) -> Outcome<String, String> {
    Outcome::fulfilled(v.to_string())
}

fn err(r: &str) -> Outcome<String, String> {
    Outcome::rejected(r.to_string())
}

/// Executor that stores the outcomes it was started with, then fulfils
/// with `value` after a short delay.
fn capturing(
    slot: &Snapshot,
    value: &'static str,
) -> impl Fn(Outcomes<String, String>) -> BoxedTaskFuture<String, String> + Send + Sync + 'static
{
    let slot = Arc::clone(slot);
    move |seen: Outcomes<String, String>| -> BoxedTaskFuture<String, String> {
        *slot.lock().unwrap() = Some(seen);
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(value.to_string())
        })
    }
}

fn three_independent(probe: &ConcurrencyProbe) -> Result<Graph, TaskingError> {
    let mut graph = Graph::new();
    graph
        .register("first", delayed_ok(probe, "first", String::new(), 50), DependsOn::none())?
        .register("second", delayed_ok(probe, "second", String::new(), 50), DependsOn::none())?
        .register("third", delayed_ok(probe, "third", String::new(), 50), DependsOn::none())?;
    Ok(graph)
}

#[tokio::test]
async fn independent_tasks_run_in_parallel_up_to_concurrency() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let probe = ConcurrencyProbe::new();
        let graph = three_independent(&probe)?;

        let result = run_capped(&graph, 3).await;

        assert_eq!(
            result,
            outcomes(&[("first", ok("")), ("second", ok("")), ("third", ok(""))])
        );
        assert_eq!(probe.current(), 0);
        assert_eq!(probe.max(), 3);
        TestResult::Ok(())
    })
    .await
}

#[tokio::test]
async fn never_more_in_flight_than_concurrency() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let probe = ConcurrencyProbe::new();
        let graph = three_independent(&probe)?;

        let result = run_capped(&graph, 2).await;

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|(_, o)| o.is_fulfilled()));
        assert_eq!(probe.current(), 0);
        assert_eq!(probe.max(), 2);
        // FIFO: roots start in registration order.
        assert_eq!(probe.started(), vec!["first", "second", "third"]);
        TestResult::Ok(())
    })
    .await
}

#[tokio::test]
async fn rejecting_tasks_are_recorded_not_raised() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let probe = ConcurrencyProbe::new();
        let mut graph = Graph::new();
        graph
            .register("first", delayed_ok(&probe, "first", String::new(), 50), DependsOn::none())?
            .register("second", delayed_err(&probe, "second", String::new(), 50), DependsOn::none())?
            .register("third", delayed_err(&probe, "third", String::new(), 50), DependsOn::none())?;

        let result = run_capped(&graph, 3).await;

        assert_eq!(
            result,
            outcomes(&[("first", ok("")), ("second", err("")), ("third", err(""))])
        );
        assert_eq!(probe.current(), 0);
        assert_eq!(probe.max(), 3);
        TestResult::Ok(())
    })
    .await
}

#[tokio::test]
async fn settled_chain_passes_finished_outcomes_to_each_executor() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let first_seen: Snapshot = Arc::default();
        let second_seen: Snapshot = Arc::default();
        let third_seen: Snapshot = Arc::default();

        let mut graph = Graph::new();
        graph
            .register("first", capturing(&first_seen, "hello"), DependsOn::none())?
            .register(
                "second",
                capturing(&second_seen, "world"),
                DependsOn::none().settled("first"),
            )?
            .register(
                "third",
                capturing(&third_seen, "!"),
                [("second", DependencyKind::Settled)],
            )?;

        let result = run_capped(&graph, 3).await;

        assert_eq!(
            result,
            outcomes(&[("first", ok("hello")), ("second", ok("world")), ("third", ok("!"))])
        );
        assert_eq!(first_seen.lock().unwrap().clone(), Some(Outcomes::new()));
        assert_eq!(
            second_seen.lock().unwrap().clone(),
            Some(outcomes(&[("first", ok("hello"))]))
        );
        assert_eq!(
            third_seen.lock().unwrap().clone(),
            Some(outcomes(&[("first", ok("hello")), ("second", ok("world"))]))
        );
        TestResult::Ok(())
    })
    .await
}

#[tokio::test]
async fn unmet_dependency_kind_skips_task() -> TestResult {
    crate::common::with_timeout(async {
        init_tracing();

        let probe = ConcurrencyProbe::new();
        let mut graph = Graph::new();
        graph
            .register("first", delayed_err(&probe, "first", "hello".to_string(), 50), DependsOn::none())?
            .register(
                "second",
                delayed_ok(&probe, "second", "world".to_string(), 50),
                DependsOn::none().fulfilled("first"),
            )?
            .register(
                "third",
                delayed_ok(&probe, "third", "!".to_string(), 50),
                DependsOn::none().rejected("first"),
            )?;

        let result = run_capped(&graph, 3).await;

        assert_eq!(result, outcomes(&[("first", err("hello")), ("third", ok("!"))]));
        assert!(!result.contains_key("second"));
        assert_eq!(probe.seen_by("second"), None);
        TestResult::Ok(())
    })
    .await
}

#[test]
fn depending_on_unknown_task_fails_synchronously() {
    let mut graph = Graph::new();
    let result = graph.register(
        "first",
        |_| async { Ok(0.to_string()) },
        DependsOn::none().fulfilled("hello"),
    );

    match result {
        Err(TaskingError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "first");
            assert_eq!(dependency, "hello");
        }
        Err(e) => panic!("Expected UnknownDependency, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(graph.is_empty());
}

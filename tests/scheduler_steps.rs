// tests/scheduler_steps.rs

use std::future::{ready, Ready};

use tasking::dag::{CompletionStep, Scheduler, TaskRunState};
use tasking::types::OutcomeKind;
use tasking::{DependsOn, Outcome, Outcomes, TaskGraph};

type Graph = TaskGraph<String, String>;

fn noop() -> impl Fn(Outcomes<String, String>) -> Ready<Result<String, String>> + Send + Sync + 'static {
    |_: Outcomes<String, String>| ready(Ok(String::new()))
}

fn ok() -> Outcome<String, String> {
    Outcome::fulfilled("ok".to_string())
}

fn fail() -> Outcome<String, String> {
    Outcome::rejected("fail".to_string())
}

/// r1, r2 roots; x needs r1 fulfilled; y needs r1 rejected; z needs x and r2 settled.
fn graph() -> Graph {
    let mut graph = Graph::new();
    graph
        .register("r1", noop(), DependsOn::none())
        .and_then(|g| g.register("r2", noop(), DependsOn::none()))
        .and_then(|g| g.register("x", noop(), DependsOn::none().fulfilled("r1")))
        .and_then(|g| g.register("y", noop(), DependsOn::none().rejected("r1")))
        .and_then(|g| g.register("z", noop(), DependsOn::none().settled("x").settled("r2")))
        .expect("graph registers");
    graph
}

#[test]
fn initial_frontier_is_roots_in_registration_order() {
    let graph = graph();
    let mut scheduler = Scheduler::new(&graph);

    assert_eq!(scheduler.frontier_len(), 2);
    assert_eq!(scheduler.run_state_of("r1"), Some(TaskRunState::Eligible));
    assert_eq!(scheduler.run_state_of("x"), Some(TaskRunState::Pending));
    assert_eq!(scheduler.run_state_of("unknown"), None);

    let first = scheduler.start_next().expect("r1 queued");
    let second = scheduler.start_next().expect("r2 queued");
    assert_eq!(first.key, "r1");
    assert_eq!(second.key, "r2");
    assert!(first.outcomes.is_empty());
    assert!(scheduler.start_next().is_none());
    assert_eq!(scheduler.in_flight_len(), 2);
    assert_eq!(scheduler.run_state_of("r2"), Some(TaskRunState::Running));
}

#[test]
fn capacity_respects_concurrency_and_frontier() {
    let graph = graph();
    let mut scheduler = Scheduler::new(&graph);

    assert!(scheduler.has_capacity(1));
    let r1 = scheduler.start_next().expect("r1 queued");
    assert!(!scheduler.has_capacity(1));
    assert!(scheduler.has_capacity(2));

    scheduler.complete(r1.id, ok());
    assert!(scheduler.has_capacity(1));
}

#[test]
fn completion_promotes_only_children_whose_requirements_hold() {
    let graph = graph();
    let mut scheduler = Scheduler::new(&graph);

    let r1 = scheduler.start_next().expect("r1 queued");
    let r2 = scheduler.start_next().expect("r2 queued");

    let step = scheduler.complete(r1.id, ok());
    assert_eq!(
        step,
        CompletionStep {
            finished: Some(("r1".to_string(), OutcomeKind::Fulfilled)),
            promoted: vec!["x".to_string()],
        }
    );
    assert_eq!(scheduler.run_state_of("y"), Some(TaskRunState::Pending));

    let x = scheduler.start_next().expect("x promoted");
    assert_eq!(x.key, "x");
    assert_eq!(x.outcomes.kind_of("r1"), Some(OutcomeKind::Fulfilled));

    // z still waits on r2.
    let step = scheduler.complete(x.id, fail());
    assert!(step.promoted.is_empty());

    let step = scheduler.complete(r2.id, ok());
    assert_eq!(step.promoted, vec!["z".to_string()]);

    let z = scheduler.start_next().expect("z promoted");
    scheduler.complete(z.id, ok());

    assert!(scheduler.is_finished());
    assert_eq!(scheduler.never_eligible(), vec!["y".to_string()]);
    assert_eq!(scheduler.run_state_of("y"), Some(TaskRunState::Pending));

    let outcomes = scheduler.into_outcomes();
    assert_eq!(outcomes.keys().collect::<Vec<_>>(), vec!["r1", "r2", "x", "z"]);
    assert_eq!(outcomes.rejected("x").map(String::as_str), Some("fail"));
}

#[test]
fn completion_for_task_not_in_flight_is_ignored() {
    let graph = graph();
    let mut scheduler = Scheduler::new(&graph);

    let r1 = scheduler.start_next().expect("r1 queued");
    scheduler.complete(r1.id, ok());

    // Second completion for the same task: ignored, first outcome kept.
    let step = scheduler.complete(r1.id, fail());
    assert_eq!(step, CompletionStep::default());
    assert_eq!(scheduler.outcomes().kind_of("r1"), Some(OutcomeKind::Fulfilled));

    // A task that was never started.
    let z = graph.id_of("z").expect("z registered");
    let step = scheduler.complete(z, ok());
    assert!(step.finished.is_none());
    assert!(!scheduler.outcomes().contains_key("z"));
}

#[test]
fn snapshot_is_not_affected_by_later_completions() {
    let graph = graph();
    let mut scheduler = Scheduler::new(&graph);

    let r1 = scheduler.start_next().expect("r1 queued");
    let r2 = scheduler.start_next().expect("r2 queued");
    scheduler.complete(r1.id, ok());

    let x = scheduler.start_next().expect("x promoted");
    scheduler.complete(r2.id, ok());

    assert_eq!(x.outcomes.keys().collect::<Vec<_>>(), vec!["r1"]);
    assert_eq!(scheduler.outcomes().len(), 2);
}

#[test]
fn empty_graph_is_finished_immediately() {
    let graph = Graph::new();
    let scheduler = Scheduler::new(&graph);

    assert!(scheduler.is_finished());
    assert!(scheduler.into_outcomes().is_empty());
}

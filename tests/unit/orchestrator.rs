//! Orchestrator tests: network setup ordering, stagger pauses, skip and
//! continue-on-failure behavior.
//!
//! Time-sensitive tests run under a paused tokio clock, so the fixed stagger
//! pauses are observed without real waiting.

#![allow(clippy::expect_used)]

use stackctl::compose::{ComposeInvoker, SHARED_NETWORKS};
use stackctl::domain::{Action, ExecutionOptions, ServiceGroup};
use stackctl::orchestrator::{Orchestrator, STAGGER_DELAY};
use stackctl::output::OutputContext;

use crate::mocks::{Call, RecordingRunner, calls, stack_root};

fn quiet_ctx() -> OutputContext {
    OutputContext::new(true, true)
}

fn compose_calls(recorded: &[Call]) -> Vec<&Call> {
    recorded
        .iter()
        .filter(|call| call.args.first().map(String::as_str) == Some("compose"))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_up_creates_networks_once_before_first_service() {
    let root = stack_root(&["traefik"]);
    let (runner, log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    Orchestrator::new(&invoker, &ctx)
        .run_batch(
            &[ServiceGroup::Traefik],
            Action::Up,
            ExecutionOptions::default(),
        )
        .await;

    let recorded = calls(&log);
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[0].args, ["network", "create", SHARED_NETWORKS[0]]);
    assert_eq!(recorded[1].args, ["network", "create", SHARED_NETWORKS[1]]);
    assert_eq!(recorded[2].args, ["compose", "up", "-d"]);
    assert!(recorded[2].dir.ends_with("traefik"));
}

#[tokio::test(start_paused = true)]
async fn test_up_networks_created_once_regardless_of_selection_size() {
    let root = stack_root(&["traefik", "postgres", "n8n"]);
    let (runner, log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    Orchestrator::new(&invoker, &ctx)
        .run_batch(&ServiceGroup::ALL, Action::Up, ExecutionOptions::default())
        .await;

    let recorded = calls(&log);
    let network_creates = recorded
        .iter()
        .filter(|call| call.args.first().map(String::as_str) == Some("network"))
        .count();
    assert_eq!(network_creates, 2);
    // Networks come before any compose operation.
    assert_eq!(recorded[0].args[0], "network");
    assert_eq!(recorded[1].args[0], "network");
    assert_eq!(compose_calls(&recorded).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_up_multi_service_pauses_n_minus_one_times() {
    let root = stack_root(&["traefik", "postgres", "n8n"]);
    let (runner, _log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    let start = tokio::time::Instant::now();
    Orchestrator::new(&invoker, &ctx)
        .run_batch(&ServiceGroup::ALL, Action::Up, ExecutionOptions::default())
        .await;

    assert_eq!(start.elapsed(), STAGGER_DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_up_single_service_has_no_pause() {
    let root = stack_root(&["postgres"]);
    let (runner, _log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    let start = tokio::time::Instant::now();
    Orchestrator::new(&invoker, &ctx)
        .run_batch(
            &[ServiceGroup::Postgres],
            Action::Up,
            ExecutionOptions::default(),
        )
        .await;

    assert_eq!(start.elapsed().as_nanos(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_down_skips_networks_and_pauses() {
    let root = stack_root(&["traefik", "postgres", "n8n"]);
    let (runner, log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    let start = tokio::time::Instant::now();
    Orchestrator::new(&invoker, &ctx)
        .run_batch(&ServiceGroup::ALL, Action::Down, ExecutionOptions::default())
        .await;

    assert_eq!(start.elapsed().as_nanos(), 0);
    let recorded = calls(&log);
    assert_eq!(recorded.len(), 3);
    for (call, group) in recorded.iter().zip(ServiceGroup::ALL) {
        assert_eq!(call.args, ["compose", "down"]);
        assert!(call.dir.ends_with(group.dir_name()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_missing_directory_is_skipped() {
    let root = stack_root(&[]);
    let (runner, log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    Orchestrator::new(&invoker, &ctx)
        .run_batch(
            &[ServiceGroup::Postgres],
            Action::Down,
            ExecutionOptions::default(),
        )
        .await;

    assert!(calls(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_batch_continues_after_service_failure() {
    let root = stack_root(&["traefik", "postgres"]);
    let (mut runner, log) = RecordingRunner::new();
    runner.fail_dirs = vec!["traefik"];
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    Orchestrator::new(&invoker, &ctx)
        .run_batch(
            &[ServiceGroup::Traefik, ServiceGroup::Postgres],
            Action::Stop,
            ExecutionOptions::default(),
        )
        .await;

    let recorded = calls(&log);
    assert_eq!(recorded.len(), 2);
    assert!(recorded[1].dir.ends_with("postgres"));
}

#[tokio::test(start_paused = true)]
async fn test_foreground_up_omits_detach_flag() {
    let root = stack_root(&["n8n"]);
    let (runner, log) = RecordingRunner::new();
    let invoker = ComposeInvoker::new(runner, root.path().to_path_buf());
    let ctx = quiet_ctx();

    let opts = ExecutionOptions {
        detached: false,
        ..ExecutionOptions::default()
    };
    Orchestrator::new(&invoker, &ctx)
        .run_batch(&[ServiceGroup::N8n], Action::Up, opts)
        .await;

    let recorded = calls(&log);
    let compose = compose_calls(&recorded);
    assert_eq!(compose.len(), 1);
    assert_eq!(compose[0].args, ["compose", "up"]);
}

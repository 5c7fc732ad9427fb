//! Fix and container restart action tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ugreen_panel::app::options::{ContainerOptions, FixOptions, RestartMode};
use ugreen_panel::exec::actions::{restart_container, run_fix};
use ugreen_panel::exec::runner::CommandOutcome;

use crate::support::RecordingRunner;

fn container_options(mode: RestartMode) -> ContainerOptions {
    ContainerOptions {
        ct_id: "402".to_string(),
        tool: "pct".to_string(),
        restart_mode: mode,
        timeout: Duration::from_secs(30),
        stop_start_delay: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn test_fix_runs_script_without_arguments() {
    let runner = RecordingRunner::succeeding();
    let options = FixOptions {
        script: "/opt/ugreen/fix.sh".into(),
        timeout: Duration::from_secs(120),
    };

    let outcome = run_fix(&options, &runner).await;

    assert!(outcome.success());
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.program, "/opt/ugreen/fix.sh");
    assert!(calls[0].0.args.is_empty());
    assert_eq!(calls[0].1, Duration::from_secs(120));
}

#[tokio::test]
async fn test_reboot_mode_issues_single_reboot() {
    let runner = RecordingRunner::succeeding();
    let slept = Arc::new(Mutex::new(Vec::new()));
    let slept_clone = slept.clone();

    let outcomes = restart_container(&container_options(RestartMode::Reboot), &runner, |d| {
        slept_clone.lock().unwrap().push(d);
        async {}
    })
    .await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(runner.command_lines(), vec!["pct reboot 402"]);
    assert_eq!(runner.calls()[0].1, Duration::from_secs(30));
    assert!(slept.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stop_start_mode_issues_stop_then_start_with_delay() {
    let runner = Arc::new(RecordingRunner::succeeding());
    let events = Arc::new(Mutex::new(Vec::new()));

    let runner_for_sleep = runner.clone();
    let events_for_sleep = events.clone();
    let outcomes = restart_container(
        &container_options(RestartMode::StopStart),
        runner.as_ref(),
        move |d| {
            let calls_so_far = runner_for_sleep.calls().len();
            events_for_sleep.lock().unwrap().push((d, calls_so_far));
            async {}
        },
    )
    .await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(runner.command_lines(), vec!["pct stop 402", "pct start 402"]);
    // the delay happens after stop and before start
    assert_eq!(
        events.lock().unwrap().as_slice(),
        &[(Duration::from_secs(2), 1)]
    );
}

#[tokio::test]
async fn test_restart_ignores_failing_exit_codes() {
    let runner = RecordingRunner::new(CommandOutcome::Completed {
        code: 255,
        output: "CT 402 not running".to_string(),
    });

    let outcomes = restart_container(
        &container_options(RestartMode::StopStart),
        &runner,
        |_| async {},
    )
    .await;

    // start still runs after a failed stop
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.exit_code() == 255));
    assert_eq!(runner.calls().len(), 2);
}

//! The two privileged actions: run the fix script, restart the container

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::options::{ContainerOptions, FixOptions, RestartMode};
use crate::exec::runner::{CommandOutcome, CommandRunner, CommandSpec};

/// Run the fix script with no arguments.
///
/// The script writes its own log file, so the output only goes to debug logs.
pub async fn run_fix(options: &FixOptions, runner: &dyn CommandRunner) -> CommandOutcome {
    let spec = CommandSpec::new(options.script.to_string_lossy());
    info!("Running fix script: {}", spec);

    let outcome = runner.run(&spec, options.timeout).await;
    log_outcome(&spec, &outcome);
    outcome
}

/// Restart the container according to the configured mode.
///
/// Returns the outcome of every tool invocation, in order.
pub async fn restart_container<S, F>(
    options: &ContainerOptions,
    runner: &dyn CommandRunner,
    sleep_fn: S,
) -> Vec<CommandOutcome>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!(
        "Restarting container {} (mode: {})",
        options.ct_id, options.restart_mode
    );

    match options.restart_mode {
        RestartMode::StopStart => {
            let stop = container_command(options, "stop", runner).await;
            sleep_fn(options.stop_start_delay).await;
            let start = container_command(options, "start", runner).await;
            vec![stop, start]
        }
        RestartMode::Reboot => vec![container_command(options, "reboot", runner).await],
    }
}

async fn container_command(
    options: &ContainerOptions,
    action: &str,
    runner: &dyn CommandRunner,
) -> CommandOutcome {
    let spec = CommandSpec::new(options.tool.as_str())
        .arg(action)
        .arg(options.ct_id.as_str());
    let outcome = runner.run(&spec, options.timeout).await;
    log_outcome(&spec, &outcome);
    outcome
}

fn log_outcome(spec: &CommandSpec, outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Completed { code: 0, output } => {
            info!("Command succeeded: {}", spec);
            debug!("Output of {}: {}", spec, output);
        }
        CommandOutcome::Completed { code, output } => {
            warn!("Command exited with code {}: {}", code, spec);
            debug!("Output of {}: {}", spec, output);
        }
        other => warn!("{}", other.output()),
    }
}

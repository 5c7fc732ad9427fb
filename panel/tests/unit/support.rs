//! Shared test helpers

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::Semaphore;

use ugreen_panel::app::options::AppOptions;
use ugreen_panel::exec::runner::{CommandOutcome, CommandRunner, CommandSpec};
use ugreen_panel::server::state::ServerState;

/// Command runner that records invocations and replays a fixed outcome
pub struct RecordingRunner {
    outcome: CommandOutcome,
    delay: Duration,
    calls: Mutex<Vec<(CommandSpec, Duration)>>,
}

impl RecordingRunner {
    pub fn new(outcome: CommandOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Each call sleeps for `delay` before it is recorded
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn succeeding() -> Self {
        Self::new(CommandOutcome::Completed {
            code: 0,
            output: String::new(),
        })
    }

    pub fn calls(&self) -> Vec<(CommandSpec, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|(spec, _)| spec.command_line())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec, timeout: Duration) -> CommandOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.calls.lock().unwrap().push((command.clone(), timeout));
        self.outcome.clone()
    }
}

/// Command runner that blocks every call until the test releases it.
///
/// Records `start:<command>` on entry and `end:<command>` once a permit
/// is handed out through `release`.
pub struct GatedRunner {
    gate: Semaphore,
    events: Mutex<Vec<String>>,
}

impl GatedRunner {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn started(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with("start:"))
            .count()
    }
}

#[async_trait]
impl CommandRunner for GatedRunner {
    async fn run(&self, command: &CommandSpec, _timeout: Duration) -> CommandOutcome {
        let line = command.command_line();
        self.events.lock().unwrap().push(format!("start:{}", line));
        self.gate.acquire().await.unwrap().forget();
        self.events.lock().unwrap().push(format!("end:{}", line));
        CommandOutcome::Completed {
            code: 0,
            output: String::new(),
        }
    }
}

/// Poll `condition` every 10ms, panicking after `limit`
pub async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + limit;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {:?}",
            limit
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Options pointing at `log_path`, no delay between stop and start
pub fn test_options(token: Option<&str>, log_path: &Path) -> AppOptions {
    let mut options = AppOptions::default();
    options.server.token = token.map(|t| SecretString::from(t.to_string()));
    options.container.ct_id = "402".to_string();
    options.container.stop_start_delay = Duration::ZERO;
    options.fix.script = "/usr/local/sbin/ugreen-reset-and-restart.sh".into();
    options.log_tail.path = log_path.to_path_buf();
    options
}

pub fn test_state(options: AppOptions, runner: Arc<dyn CommandRunner>) -> Arc<ServerState> {
    Arc::new(ServerState::new(Arc::new(options), runner))
}

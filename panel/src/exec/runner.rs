//! Subprocess execution with a deadline

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Exit code reported for a command that ran past its timeout
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported for a command that could not be launched
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Space-joined command line, used in messages only
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Result of running a command. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed { code: i32, output: String },
    TimedOut { command: String },
    LaunchFailed { command: String, cause: String },
}

impl CommandOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutcome::Completed { code, .. } => *code,
            CommandOutcome::TimedOut { .. } => TIMEOUT_EXIT_CODE,
            CommandOutcome::LaunchFailed { .. } => LAUNCH_FAILURE_EXIT_CODE,
        }
    }

    /// Combined output for completed runs, a describing message otherwise
    pub fn output(&self) -> String {
        match self {
            CommandOutcome::Completed { output, .. } => output.clone(),
            CommandOutcome::TimedOut { command } => format!("Timeout running: {}", command),
            CommandOutcome::LaunchFailed { command, cause } => {
                format!("Error running: {} -> {}", command, cause)
            }
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code() == 0
    }
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec, timeout: Duration) -> CommandOutcome;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandSpec, timeout: Duration) -> CommandOutcome {
        let command_line = command.command_line();
        debug!("Running command: {} (timeout {:?})", command_line, timeout);

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                return CommandOutcome::LaunchFailed {
                    command: command_line,
                    cause: e.to_string(),
                }
            }
        };

        // dropping the future on timeout kills the child
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                CommandOutcome::Completed {
                    code: exit_code(&output.status),
                    output: combined.trim().to_string(),
                }
            }
            Ok(Err(e)) => CommandOutcome::LaunchFailed {
                command: command_line,
                cause: e.to_string(),
            },
            Err(_) => CommandOutcome::TimedOut {
                command: command_line,
            },
        }
    }
}

/// Exit code, or the negated signal number when killed by a signal
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    LAUNCH_FAILURE_EXIT_CODE
}

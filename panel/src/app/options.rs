//! Application configuration options
//!
//! Everything is read once from `UGREEN_*` environment variables at startup
//! and stays fixed for the life of the process.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::PanelError;
use crate::logs::{LogLevel, LogOptions};

pub const ENV_HOST: &str = "UGREEN_WEB_HOST";
pub const ENV_PORT: &str = "UGREEN_WEB_PORT";
pub const ENV_TOKEN: &str = "UGREEN_WEB_TOKEN";
pub const ENV_CT_ID: &str = "UGREEN_CT_ID";
pub const ENV_CT_TOOL: &str = "UGREEN_CT_TOOL";
pub const ENV_CT_RESTART_MODE: &str = "UGREEN_CT_RESTART_MODE";
pub const ENV_CT_TIMEOUT_SEC: &str = "UGREEN_CT_TIMEOUT_SEC";
pub const ENV_CT_STOP_START_DELAY_SEC: &str = "UGREEN_CT_STOP_START_DELAY_SEC";
pub const ENV_FIX_SCRIPT: &str = "UGREEN_FIX_SCRIPT";
pub const ENV_FIX_TIMEOUT_SEC: &str = "UGREEN_FIX_TIMEOUT_SEC";
pub const ENV_FIX_LOG: &str = "UGREEN_FIX_LOG";
pub const ENV_LOG_TAIL_LINES: &str = "UGREEN_LOG_TAIL_LINES";
pub const ENV_LOG_LEVEL: &str = "UGREEN_WEB_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "UGREEN_WEB_LOG_JSON";
pub const ENV_LOG_DIR: &str = "UGREEN_WEB_LOG_DIR";
pub const ENV_LOG_STDOUT: &str = "UGREEN_WEB_LOG_STDOUT";

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Server configuration
    pub server: ServerOptions,

    /// Container restart configuration
    pub container: ContainerOptions,

    /// Fix script configuration
    pub fix: FixOptions,

    /// Log tail shown on the dashboard
    pub log_tail: LogTailOptions,

    /// Logging of the panel itself
    pub logging: LogOptions,
}

impl AppOptions {
    /// Build options from the process environment
    pub fn from_env() -> Result<Self, PanelError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults. Set but unparsable values are a
    /// configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PanelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            options.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, ENV_PORT)? {
            options.server.port = port;
        }
        // empty token disables auth
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            options.server.token = Some(SecretString::from(token));
        }

        if let Some(ct_id) = lookup(ENV_CT_ID) {
            options.container.ct_id = ct_id;
        }
        if let Some(tool) = lookup(ENV_CT_TOOL) {
            options.container.tool = tool;
        }
        if let Some(mode) = parse_var::<RestartMode, _>(&lookup, ENV_CT_RESTART_MODE)? {
            options.container.restart_mode = mode;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CT_TIMEOUT_SEC)? {
            options.container.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CT_STOP_START_DELAY_SEC)? {
            options.container.stop_start_delay = Duration::from_secs(secs);
        }

        if let Some(script) = lookup(ENV_FIX_SCRIPT) {
            options.fix.script = PathBuf::from(script);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_FIX_TIMEOUT_SEC)? {
            options.fix.timeout = Duration::from_secs(secs);
        }

        if let Some(log_file) = lookup(ENV_FIX_LOG) {
            options.log_tail.path = PathBuf::from(log_file);
        }
        if let Some(lines) = parse_var(&lookup, ENV_LOG_TAIL_LINES)? {
            options.log_tail.max_lines = lines;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            options.logging.log_level = level
                .parse::<LogLevel>()
                .map_err(|e| PanelError::ConfigError(format!("{}: {}", ENV_LOG_LEVEL, e)))?;
        }
        if let Some(json) = parse_var(&lookup, ENV_LOG_JSON)? {
            options.logging.json_format = json;
        }
        if let Some(stdout) = parse_var(&lookup, ENV_LOG_STDOUT)? {
            options.logging.stdout = stdout;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|d| !d.is_empty()) {
            options.logging.log_dir = Some(PathBuf::from(dir));
        }

        Ok(options)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, PanelError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            PanelError::ConfigError(format!("Invalid value for {}: {:?} ({})", key, raw, e))
        }),
    }
}

/// Lifecycle options for the panel
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(10),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Shared token; `None` leaves the panel open
    pub token: Option<SecretString>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8088,
            token: None,
        }
    }
}

/// How the container gets restarted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestartMode {
    #[default]
    Reboot,
    StopStart,
}

impl RestartMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartMode::Reboot => "reboot",
            RestartMode::StopStart => "stop-start",
        }
    }
}

impl FromStr for RestartMode {
    type Err = std::convert::Infallible;

    /// Anything other than `stop-start` means reboot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop-start" => Ok(RestartMode::StopStart),
            _ => Ok(RestartMode::Reboot),
        }
    }
}

impl std::fmt::Display for RestartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container restart options
#[derive(Debug, Clone)]
pub struct ContainerOptions {
    /// Container id passed to the tool
    pub ct_id: String,

    /// Container management executable
    pub tool: String,

    /// Restart strategy
    pub restart_mode: RestartMode,

    /// Timeout for each tool invocation
    pub timeout: Duration,

    /// Pause between `stop` and `start`
    pub stop_start_delay: Duration,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            ct_id: "402".to_string(),
            tool: "pct".to_string(),
            restart_mode: RestartMode::Reboot,
            timeout: Duration::from_secs(30),
            stop_start_delay: Duration::from_secs(2),
        }
    }
}

/// Fix script options
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Executable run with no arguments
    pub script: PathBuf,

    /// Timeout for the whole script
    pub timeout: Duration,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            script: PathBuf::from("/usr/local/sbin/ugreen-reset-and-restart.sh"),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Log tail options
#[derive(Debug, Clone)]
pub struct LogTailOptions {
    /// Log file written by the fix script
    pub path: PathBuf,

    /// Number of trailing lines shown
    pub max_lines: usize,
}

impl Default for LogTailOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/log/ugreen-fix.log"),
            max_lines: 220,
        }
    }
}

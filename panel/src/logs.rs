//! Logging configuration

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::errors::PanelError;

/// Log level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_filter_string())
    }
}

/// Logging options
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log level, overridden by `RUST_LOG` when set
    pub log_level: LogLevel,

    /// Write logs to stdout
    pub stdout: bool,

    /// Directory for a daily rolling log file, if any
    pub log_dir: Option<PathBuf>,

    /// Enable JSON format
    pub json_format: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            stdout: true,
            log_dir: None,
            json_format: false,
        }
    }
}

const LOG_FILE_PREFIX: &str = "ugreen-panel.log";

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Initialize logging.
///
/// The returned guard flushes the file writer on drop and must be held for
/// as long as the process logs.
pub fn init_logging(options: &LogOptions) -> Result<Option<WorkerGuard>, PanelError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_level.to_filter_string()));

    let mut layers: Vec<Box<dyn Layer<FilteredRegistry> + Send + Sync>> = Vec::new();

    if options.stdout {
        if options.json_format {
            layers.push(fmt::layer().json().boxed());
        } else {
            layers.push(fmt::layer().boxed());
        }
    }

    let mut guard = None;
    if let Some(dir) = &options.log_dir {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
        if options.json_format {
            layers.push(file_layer.json().boxed());
        } else {
            layers.push(file_layer.boxed());
        }
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| PanelError::ConfigError(e.to_string()))?;

    Ok(guard)
}

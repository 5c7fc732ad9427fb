//! Error types for the panel

use thiserror::Error;

/// Main error type for the panel.
///
/// Request handling never produces these: command and log failures are folded
/// into outcomes and placeholders. They cover startup and lifecycle only.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::app::options::AppOptions;
use crate::errors::PanelError;
use crate::exec::runner::{CommandRunner, ProcessRunner};
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run the panel with real child processes until `shutdown_signal` fires
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()>,
) -> Result<(), PanelError> {
    run_with_runner(Arc::new(options), Arc::new(ProcessRunner), shutdown_signal).await
}

/// Run the panel with the given command runner
pub async fn run_with_runner(
    options: Arc<AppOptions>,
    runner: Arc<dyn CommandRunner>,
    shutdown_signal: impl Future<Output = ()>,
) -> Result<(), PanelError> {
    info!("Initializing UGREEN panel...");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let state = Arc::new(ServerState::new(options.clone(), runner));
    if !state.token_guard.is_enabled() {
        warn!("No access token configured, the panel is open to anyone who can reach it");
    }
    let mut server_handle = serve(&options.server, state, async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown signal received, shutting down...");
        }
        joined = &mut server_handle => {
            error!("HTTP server stopped unexpectedly");
            return joined.map_err(|e| PanelError::ShutdownError(e.to_string()))?;
        }
    }

    let _ = shutdown_tx.send(());

    // an action in flight keeps its connection open until it finishes
    match tokio::time::timeout(options.lifecycle.max_shutdown_delay, server_handle).await {
        Ok(joined) => {
            joined.map_err(|e| PanelError::ShutdownError(e.to_string()))??;
            info!("Shutdown complete");
            Ok(())
        }
        Err(_) => {
            error!(
                "Shutdown timed out after {:?}, forcing shutdown...",
                options.lifecycle.max_shutdown_delay
            );
            Err(PanelError::ShutdownError("graceful shutdown timed out".to_string()))
        }
    }
}

//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::authn::token_guard::require_token;
use crate::errors::PanelError;
use crate::server::handlers::{container_handler, fallback_handler, fix_handler};
use crate::server::state::ServerState;

/// Build the router.
///
/// POST on `/fix` and `/ct` runs the action. Every other method on those
/// paths falls through to `fallback_handler`, so GET renders the dashboard
/// and anything else gets the same 501 as an unrouted path. The token check
/// wraps every route and the fallback.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Actions
        .route("/fix", post(fix_handler).fallback(fallback_handler))
        .route("/ct", post(container_handler).fallback(fallback_handler))
        .fallback(fallback_handler)
        // State and middleware
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), PanelError>>, PanelError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| PanelError::ServerError(format!("bind {}: {}", addr, e)))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| PanelError::ServerError(e.to_string()))
    });

    Ok(handle)
}

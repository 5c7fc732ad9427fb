//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

use crate::exec::actions::{restart_container, run_fix};
use crate::filesys::tail::read_tail;
use crate::server::page::DashboardView;
use crate::server::state::ServerState;

/// Body returned after an action: bounce the browser back to the dashboard
pub const REFRESH_BODY: &str = "<meta http-equiv='refresh' content='0; url=/'/>OK";

/// HTML response with caching disabled; every reply goes through here
pub fn html_response(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body.into(),
    )
        .into_response()
}

/// Dashboard handler, served for every GET path
pub async fn dashboard_handler(State(state): State<Arc<ServerState>>) -> Response {
    let last_log = read_tail(&state.log_file, state.options.log_tail.max_lines).await;

    let view = DashboardView {
        ct_id: state.options.container.ct_id.clone(),
        last_log,
        token_qs: state.token_guard.query_fragment(),
    };

    html_response(StatusCode::OK, view.render())
}

/// Fix handler: run the fix script, then redirect whatever the result
pub async fn fix_handler(State(state): State<Arc<ServerState>>) -> Response {
    // Detached: a client that hangs up must not cancel a half-done action
    let task = tokio::spawn(async move {
        let _guard = state.action_lock.lock().await;
        run_fix(&state.options.fix, state.runner.as_ref()).await
    });

    match task.await {
        Ok(outcome) => info!("Fix script finished with code {}", outcome.exit_code()),
        Err(e) => error!("Fix task failed: {}", e),
    }

    html_response(StatusCode::OK, REFRESH_BODY)
}

/// Container handler: restart the container, then redirect whatever the result
pub async fn container_handler(State(state): State<Arc<ServerState>>) -> Response {
    let task = tokio::spawn(async move {
        let _guard = state.action_lock.lock().await;
        restart_container(
            &state.options.container,
            state.runner.as_ref(),
            tokio::time::sleep,
        )
        .await
    });

    match task.await {
        Ok(outcomes) => debug!(
            "Container restart exit codes: {:?}",
            outcomes.iter().map(|o| o.exit_code()).collect::<Vec<_>>()
        ),
        Err(e) => error!("Container restart task failed: {}", e),
    }

    html_response(StatusCode::OK, REFRESH_BODY)
}

/// Fallback for unrouted paths and methods: GET renders the dashboard,
/// POST is 404, anything else (HEAD included) is 501
pub async fn fallback_handler(method: Method, state: State<Arc<ServerState>>) -> Response {
    match method {
        Method::GET => dashboard_handler(state).await,
        Method::POST => html_response(StatusCode::NOT_FOUND, "Not Found"),
        _ => html_response(StatusCode::NOT_IMPLEMENTED, "Not Implemented"),
    }
}

//! Shared-token access check
//!
//! The token travels either as a `token` query parameter (so that plain HTML
//! forms on phones can carry it) or as an `X-Token` header. A non-empty
//! query parameter wins over the header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::server::handlers::html_response;
use crate::server::state::ServerState;

pub const TOKEN_QUERY_PARAM: &str = "token";
pub const TOKEN_HEADER: &str = "x-token";

/// Compares request credentials against the configured secret
#[derive(Debug, Clone, Default)]
pub struct TokenGuard {
    secret: Option<SecretString>,
}

impl TokenGuard {
    /// `None` or an empty secret leaves every request through
    pub fn new(secret: Option<SecretString>) -> Self {
        Self {
            secret: secret.filter(|s| !s.expose_secret().is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Whether a request with this query string and headers may proceed
    pub fn check(&self, query: Option<&str>, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };

        let supplied = token_from_query(query).unwrap_or_else(|| token_from_header(headers));
        supplied == secret.expose_secret()
    }

    /// `?token=<encoded secret>` to re-append to form actions, empty when open
    pub fn query_fragment(&self) -> String {
        match &self.secret {
            Some(secret) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(secret.expose_secret().as_bytes()).collect();
                format!("?{}={}", TOKEN_QUERY_PARAM, encoded)
            }
            None => String::new(),
        }
    }
}

/// First non-empty `token` value; blank values count as absent
fn token_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, value)| key == TOKEN_QUERY_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn token_from_header(headers: &HeaderMap) -> String {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Middleware rejecting requests that fail the token check with 403
pub async fn require_token(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.token_guard.check(request.uri().query(), request.headers()) {
        return next.run(request).await;
    }

    warn!(
        "Rejected {} {}: invalid or missing token",
        request.method(),
        request.uri().path()
    );
    html_response(StatusCode::FORBIDDEN, "Forbidden")
}

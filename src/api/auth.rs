//! Static bearer-token check for the booking routes

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::dto::ApiResponse;

/// Accepted tokens. An empty set disables the check.
#[derive(Clone, Default)]
pub struct AuthState {
    tokens: Arc<HashSet<String>>,
}

impl AuthState {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: Arc::new(tokens.into_iter().collect()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim)
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !auth.is_enabled() {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token);

    match token {
        Some(token) if auth.accepts(token) => next.run(request).await,
        Some(_) => unauthorized("Invalid token"),
        None => unauthorized("Missing bearer token"),
    }
}

fn unauthorized(message: &str) -> Response {
    debug!(reason = message, "Rejected unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
    }

    #[test]
    fn empty_token_list_disables_auth() {
        assert!(!AuthState::default().is_enabled());
        let auth = AuthState::new(["secret".to_string()]);
        assert!(auth.is_enabled());
        assert!(auth.accepts("secret"));
        assert!(!auth.accepts("other"));
    }
}

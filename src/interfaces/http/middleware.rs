//! Authentication middleware for Axum
//!
//! - `api_key_middleware`: `x-api-key` check in front of `/speak`
//! - `admin_middleware`: `Authorization: Bearer <admin secret>` in front of
//!   key administration

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::{AdminGate, KeyManager};
use crate::shared::{AuthFailure, GatewayError};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication state shared by both middlewares
#[derive(Clone)]
pub struct AuthState {
    pub keys: Arc<KeyManager>,
    pub admin: AdminGate,
    /// Whether `/speak` requires a key at all
    pub require_key: bool,
}

/// Key that authenticated the current request, stored in request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedKey {
    pub id: String,
    pub name: String,
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject_speak(failure: AuthFailure) -> Response {
    metrics::counter!("speak_requests_total", "outcome" => "rejected").increment(1);
    GatewayError::from(failure).into_response()
}

/// API key middleware
pub async fn api_key_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !auth.require_key {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from);
    let Some(presented) = presented else {
        return reject_speak(AuthFailure::MissingCredentials);
    };

    match auth.keys.validate_key(&presented).await {
        Ok(Some(key)) => {
            debug!(key_id = %key.id, "API key accepted");
            request.extensions_mut().insert(AuthenticatedKey {
                id: key.id,
                name: key.name,
            });
            next.run(request).await
        }
        Ok(None) => reject_speak(AuthFailure::InvalidCredentials),
        Err(e) => e.into_response(),
    }
}

/// Admin bearer middleware
pub async fn admin_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(request.headers()) else {
        return GatewayError::from(AuthFailure::MissingCredentials).into_response();
    };

    if !auth.admin.authorize(Some(token)) {
        debug!(admin_enabled = auth.admin.is_enabled(), "Admin bearer rejected");
        return GatewayError::from(AuthFailure::InvalidCredentials).into_response();
    }

    next.run(request).await
}

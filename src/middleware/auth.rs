// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use crate::config::AUTH_COOKIE_NAME;
use crate::error::AppError;
use crate::services::SessionError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Paths reachable without a session.
const PUBLIC_PATHS: [&str; 3] = ["/health", "/api/auth/google-login", "/api/auth/logout"];
const PUBLIC_PREFIX: &str = "/api/public/";

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub picture_url: Option<String>,
}

/// Per-request authentication result, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthUser,
    /// The session token as presented
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub fn is_public_route(method: &Method, path: &str) -> bool {
    *method == Method::OPTIONS || PUBLIC_PATHS.contains(&path) || path.starts_with(PUBLIC_PREFIX)
}

/// Session token from the cookie, else from `Authorization: Bearer`.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(AUTH_COOKIE_NAME).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Middleware that requires a valid session outside the public allow-list.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let Some(token) = extract_token(&jar, request.headers()) else {
        tracing::debug!(path = %request.uri().path(), "No session token presented");
        return Err(AppError::Unauthorized);
    };

    let claims = state.sessions.verify(&token).map_err(|e| {
        match &e {
            SessionError::Malformed(reason) => {
                tracing::warn!(reason = %reason, "Rejected malformed session token")
            }
            other => tracing::info!(reason = %other, "Rejected session token"),
        }
        AppError::InvalidToken
    })?;

    let (Some(issued_at), Some(expires_at)) = (
        DateTime::from_timestamp(claims.iat, 0),
        DateTime::from_timestamp(claims.exp, 0),
    ) else {
        return Err(AppError::InvalidToken);
    };

    request.extensions_mut().insert(AuthContext {
        user: AuthUser {
            id: claims.user_id,
            email: claims.sub,
            full_name: claims.full_name,
            picture_url: claims.picture_url,
        },
        token,
        issued_at,
        expires_at,
    });

    Ok(next.run(request).await)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google sign-in, logout and session introspection routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::AUTH_COOKIE_NAME;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::AuthContext;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/google-login", post(google_login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/get-user-profile", get(get_user_profile))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    /// Missing and blank tokens are both rejected by the verifier.
    #[serde(default)]
    id_token: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: LoginUser,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
    pub picture: Option<String>,
    pub full_name: Option<String>,
}

/// Exchange a Google ID token for a session (cookie and body).
async fn google_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let outcome = state.auth.login(&body.id_token).await?;

    let max_age = time::Duration::seconds(state.sessions.ttl().num_seconds());
    let cookie = Cookie::build((AUTH_COOKIE_NAME, outcome.session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(max_age);

    let user = outcome.user;
    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: outcome.session.token,
            expires_at: format_utc_rfc3339(outcome.session.expires_at),
            user: LoginUser {
                id: user.id,
                email: user.email,
                picture: user.picture_url,
                full_name: user.full_name,
            },
        }),
    ))
}

/// Clear the session cookie. Tokens are stateless, so nothing is revoked
/// server-side.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::build(AUTH_COOKIE_NAME).path("/")),
        StatusCode::NO_CONTENT,
    )
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub picture_url: Option<String>,
    /// The session token the request was authenticated with
    pub internal_jwt_token: String,
}

/// Current user from the stored profile, plus the presented token.
async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<SessionProfileResponse>> {
    let user = state.users.profile(&ctx.user.email, &ctx.user.id).await?;

    Ok(Json(SessionProfileResponse {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        picture_url: user.picture_url,
        internal_jwt_token: ctx.token,
    }))
}

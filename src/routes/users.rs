// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile of the signed-in user.

use crate::error::Result;
use crate::middleware::AuthContext;
use crate::models::User;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/profile", get(get_profile))
}

/// User profile response.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub picture_url: Option<String>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            picture_url: user.picture_url,
        }
    }
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<Json<ProfileResponse>> {
    let user = state.users.profile(&ctx.user.email, &ctx.user.id).await?;
    Ok(Json(user.into()))
}

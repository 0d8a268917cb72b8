// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal entry routes. Every handler acts only on the caller's entries.

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::AuthContext;
use crate::models::{Entry, EntryDraft, EntryFilter, EntryPage, EntryRequest, PageRequest};
use crate::services::entries::parse_date_range;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub reflection: String,
    pub emotions: Vec<String>,
    pub activities: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            title: entry.title,
            reflection: entry.reflection,
            emotions: entry.emotions,
            activities: entry.activities,
            created_at: format_utc_rfc3339(entry.created_at),
            updated_at: format_utc_rfc3339(entry.updated_at),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryPageResponse {
    pub content: Vec<EntryResponse>,
    /// Entries matching the filter across all pages
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub page: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub page_size: usize,
    /// Pass back as `cursor` to fetch the following page
    pub next_cursor: Option<String>,
}

impl From<EntryPage> for EntryPageResponse {
    fn from(page: EntryPage) -> Self {
        let next_cursor = page.next_page().map(encode_cursor);
        Self {
            content: page.entries.into_iter().map(EntryResponse::from).collect(),
            total: page.total,
            page: page.page.page,
            page_size: page.page.page_size,
            next_cursor,
        }
    }
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ListEntriesQuery {
    /// Inclusive lower bound on creation time
    start_date: Option<String>,
    /// Inclusive upper bound on creation time
    end_date: Option<String>,
    /// Exact emotion tag
    emotion: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
    /// Opaque continuation token; overrides `page`/`pageSize`
    cursor: Option<String>,
}

fn parse_cursor(cursor: &str) -> Result<PageRequest> {
    let invalid_cursor = || AppError::validation("cursor", "Invalid cursor");

    let decoded = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid_cursor())?;
    let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

    let (page, page_size) = decoded_str.split_once(':').ok_or_else(invalid_cursor)?;
    let page = page.parse::<i64>().map_err(|_| invalid_cursor())?;
    let page_size = page_size.parse::<i64>().map_err(|_| invalid_cursor())?;

    Ok(PageRequest::clamped(Some(page), Some(page_size)))
}

fn encode_cursor(page: PageRequest) -> String {
    URL_SAFE_NO_PAD.encode(format!("{}:{}", page.page, page.page_size))
}

/// List the caller's entries, optionally filtered by date range and/or emotion.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiQuery(params): ApiQuery<ListEntriesQuery>,
) -> Result<Json<EntryPageResponse>> {
    tracing::debug!(
        user_id = %ctx.user.id,
        start_date = ?params.start_date,
        end_date = ?params.end_date,
        emotion = ?params.emotion,
        cursor = ?params.cursor,
        "Listing entries"
    );

    let page = match params.cursor.as_deref() {
        Some(cursor) => parse_cursor(cursor)?,
        None => PageRequest::clamped(params.page, params.page_size),
    };
    let range = parse_date_range(params.start_date.as_deref(), params.end_date.as_deref())?;
    let emotion = params
        .emotion
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let user_id = ctx.user.id.as_str();
    let result = match (range, emotion) {
        (None, None) => state.entries.list(user_id, page).await?,
        (Some(range), None) => {
            state
                .entries
                .list_by_date_range(user_id, range, page)
                .await?
        }
        (None, Some(emotion)) => state.entries.list_by_emotion(user_id, &emotion, page).await?,
        (range, emotion) => {
            let filter = EntryFilter { range, emotion };
            state.entries.search(user_id, &filter, page).await?
        }
    };

    Ok(Json(result.into()))
}

// ─── Single Entries ──────────────────────────────────────────

async fn get_entry(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<EntryResponse>> {
    let entry = state.entries.get(&ctx.user.id, &id).await?;
    Ok(Json(entry.into()))
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ApiJson(body): ApiJson<EntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>)> {
    let draft = EntryDraft::try_from(body)?;
    let entry = state.entries.create(&ctx.user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<EntryRequest>,
) -> Result<Json<EntryResponse>> {
    let entry = state.entries.update(&ctx.user.id, &id, body).await?;
    Ok(Json(entry.into()))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.entries.delete(&ctx.user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

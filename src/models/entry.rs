// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal entry model, request validation and query filters.

use crate::error::AppError;
use crate::time_utils::fixed_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Longest accepted emotion or activity tag.
pub const MAX_TAG_CHARS: usize = 50;

/// Stored journal entry (document ID is the entry ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Server-generated entry ID (UUID v4)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub title: String,
    pub reflection: String,
    /// Emotion tags, in the order submitted (never empty)
    pub emotions: Vec<String>,
    /// Activity tags, in the order submitted
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(with = "fixed_rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "fixed_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Build a new entry owned by `user_id`.
    pub fn create(user_id: &str, draft: EntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: draft.title,
            reflection: draft.reflection,
            emotions: draft.emotions,
            activities: draft.activities,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable content. `created_at` is never touched.
    pub fn apply(&mut self, draft: EntryDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.reflection = draft.reflection;
        self.emotions = draft.emotions;
        self.activities = draft.activities;
        self.updated_at = now;
    }
}

// ─── Request Validation ──────────────────────────────────────

/// Entry payload for create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Title must not exceed 100 characters")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 1000, message = "Reflection must not exceed 1000 characters")
    )]
    pub reflection: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        length(min = 1, message = "At least one emotion is required"),
        custom(function = "short_tags")
    )]
    pub emotions: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "short_tags"))]
    pub activities: Vec<String>,
}

/// Fields in the order their errors are reported.
const FIELD_ORDER: [(&str, &str); 4] = [
    ("title", "Title"),
    ("reflection", "Reflection"),
    ("emotions", "Emotions"),
    ("activities", "Activities"),
];

/// Entry content that passed validation.
///
/// Only obtainable through `TryFrom<EntryRequest>`, so stores and services
/// never see unchecked input.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    title: String,
    reflection: String,
    emotions: Vec<String>,
    activities: Vec<String>,
}

impl EntryDraft {
    pub fn emotions(&self) -> &[String] {
        &self.emotions
    }
}

impl TryFrom<EntryRequest> for EntryDraft {
    type Error = AppError;

    fn try_from(request: EntryRequest) -> Result<Self, Self::Error> {
        request.validate().map_err(first_validation_error)?;

        Ok(Self {
            title: request.title,
            reflection: request.reflection,
            emotions: request.emotions,
            activities: request.activities,
        })
    }
}

fn first_validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    for (field, label) in FIELD_ORDER {
        let Some(error) = field_errors.get(field).and_then(|errs| errs.first()) else {
            continue;
        };

        let message = match (&error.message, error.code.as_ref()) {
            (Some(message), _) => message.to_string(),
            (None, "required") => format!("{label} is required"),
            (None, code) => format!("{label} is invalid ({code})"),
        };
        return AppError::validation(field, message);
    }

    AppError::BadRequest("Invalid entry".to_string())
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn short_tags(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(ValidationError::new("blank_tag")
                .with_message(Cow::Borrowed("Tags must not be blank")));
        }
        if tag.chars().count() > MAX_TAG_CHARS {
            return Err(ValidationError::new("tag_length").with_message(Cow::Owned(format!(
                "Tags must not exceed {MAX_TAG_CHARS} characters"
            ))));
        }
    }
    Ok(())
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Query Filters ───────────────────────────────────────────

/// Inclusive creation-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Restrictions applied when listing a user's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub range: Option<DateRange>,
    /// Exact emotion tag
    pub emotion: Option<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let in_range = self.range.is_none_or(|r| r.contains(entry.created_at));
        let has_emotion = self
            .emotion
            .as_ref()
            .is_none_or(|e| entry.emotions.iter().any(|tag| tag == e));
        in_range && has_emotion
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal entry operations, always scoped to the calling user.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{DateRange, Entry, EntryDraft, EntryFilter, EntryPage, PageRequest};
use crate::time_utils::{ceil_micros, floor_micros, now_utc, parse_query_timestamp};

const INVALID_DATE: &str = "Invalid date format. Use ISO format (yyyy-MM-ddTHH:mm:ss)";

#[derive(Clone)]
pub struct EntryService {
    db: Database,
}

impl EntryService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All of the user's entries, newest first.
    pub async fn list(&self, user_id: &str, page: PageRequest) -> Result<EntryPage, AppError> {
        self.search(user_id, &EntryFilter::default(), page).await
    }

    /// Entries created within `[start, end]`, both inclusive.
    pub async fn list_by_date_range(
        &self,
        user_id: &str,
        range: DateRange,
        page: PageRequest,
    ) -> Result<EntryPage, AppError> {
        let filter = EntryFilter {
            range: Some(range),
            emotion: None,
        };
        self.search(user_id, &filter, page).await
    }

    /// Entries tagged with exactly `emotion`.
    pub async fn list_by_emotion(
        &self,
        user_id: &str,
        emotion: &str,
        page: PageRequest,
    ) -> Result<EntryPage, AppError> {
        let filter = EntryFilter {
            range: None,
            emotion: Some(emotion.to_string()),
        };
        self.search(user_id, &filter, page).await
    }

    /// Any combination of date range and emotion.
    pub async fn search(
        &self,
        user_id: &str,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> Result<EntryPage, AppError> {
        let entries = self.db.query_entries(user_id, filter).await?;
        Ok(page.paginate(entries))
    }

    pub async fn get(&self, user_id: &str, entry_id: &str) -> Result<Entry, AppError> {
        self.db
            .get_entry(user_id, entry_id)
            .await?
            .ok_or_else(AppError::entry_not_found)
    }

    pub async fn create(&self, user_id: &str, draft: EntryDraft) -> Result<Entry, AppError> {
        let entry = Entry::create(user_id, draft, now_utc());
        self.db.save_entry(&entry).await?;

        tracing::info!(user_id, entry_id = %entry.id, "Created entry");
        Ok(entry)
    }

    /// Replace an entry's content.
    ///
    /// Ownership is settled before the payload is validated, so a caller
    /// probing someone else's entry always sees NotFound.
    pub async fn update<D>(&self, user_id: &str, entry_id: &str, draft: D) -> Result<Entry, AppError>
    where
        D: TryInto<EntryDraft, Error = AppError>,
    {
        let mut entry = self.get(user_id, entry_id).await?;
        let draft = draft.try_into()?;

        entry.apply(draft, now_utc());
        self.db.save_entry(&entry).await?;

        tracing::info!(user_id, entry_id, "Updated entry");
        Ok(entry)
    }

    pub async fn delete(&self, user_id: &str, entry_id: &str) -> Result<(), AppError> {
        if !self.db.delete_entry(user_id, entry_id).await? {
            return Err(AppError::entry_not_found());
        }

        tracing::info!(user_id, entry_id, "Deleted entry");
        Ok(())
    }
}

/// Parse optional `startDate`/`endDate` query values.
///
/// Both or neither must be given. Bounds are RFC 3339 or ISO local
/// date-time (taken as UTC), narrowed inward to whole microseconds so that
/// every store compares them at the precision timestamps are kept.
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<DateRange>, AppError> {
    let (start_raw, end_raw) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(s), Some(e)) => (s, e),
        (None, Some(_)) => {
            return Err(AppError::validation(
                "startDate",
                "Both startDate and endDate are required",
            ))
        }
        (Some(_), None) => {
            return Err(AppError::validation(
                "endDate",
                "Both startDate and endDate are required",
            ))
        }
    };

    let start = parse_query_timestamp(start_raw)
        .ok_or_else(|| AppError::validation("startDate", INVALID_DATE))?;
    let end = parse_query_timestamp(end_raw)
        .ok_or_else(|| AppError::validation("endDate", INVALID_DATE))?;

    if start > end {
        return Err(AppError::validation(
            "startDate",
            "startDate must be before or equal to endDate",
        ));
    }

    Ok(Some(DateRange {
        start: ceil_micros(start),
        end: floor_micros(end),
    }))
}

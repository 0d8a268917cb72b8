// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pagination of entry listings.

use super::Entry;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Zero-based page request, always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Clamp client-supplied values: negative pages become 0 and the page
    /// size is forced into `1..=MAX_PAGE_SIZE`.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(0).max(0);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        Self {
            page: usize::try_from(page).unwrap_or(usize::MAX),
            page_size: page_size as usize,
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Cut this page out of a fully ordered result set.
    pub fn paginate(self, entries: Vec<Entry>) -> EntryPage {
        let total = entries.len();
        let offset = self.offset();
        let has_more = offset.saturating_add(self.page_size) < total;
        let entries = entries
            .into_iter()
            .skip(offset)
            .take(self.page_size)
            .collect();

        EntryPage {
            entries,
            total,
            page: self,
            has_more,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}

/// One page of a user's entries.
#[derive(Debug, Clone)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    /// Number of entries matching the filter across all pages
    pub total: usize,
    pub page: PageRequest,
    pub has_more: bool,
}

impl EntryPage {
    pub fn next_page(&self) -> Option<PageRequest> {
        self.has_more.then(|| PageRequest {
            page: self.page.page + 1,
            page_size: self.page.page_size,
        })
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entry;
pub mod page;
pub mod user;

pub use entry::{DateRange, Entry, EntryDraft, EntryFilter, EntryRequest};
pub use page::{EntryPage, PageRequest};
pub use user::User;

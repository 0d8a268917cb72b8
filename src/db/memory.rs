// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store used for local development and tests.

use crate::models::{Entry, EntryFilter, User};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use std::sync::Arc;

/// Cheaply cloneable handle to shared in-memory collections.
#[derive(Clone, Default)]
pub struct MemoryDb {
    /// Keyed by email
    users: Arc<DashMap<String, User>>,
    /// Keyed by entry ID
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users.get(email).map(|u| u.value().clone())
    }

    /// Insert while holding the shard lock so concurrent first logins
    /// for one email produce exactly one user.
    pub fn create_user(&self, user: &User) -> bool {
        match self.users.entry(user.email.clone()) {
            MapEntry::Occupied(_) => false,
            MapEntry::Vacant(slot) => {
                slot.insert(user.clone());
                true
            }
        }
    }

    pub fn upsert_user(&self, user: &User) {
        self.users.insert(user.email.clone(), user.clone());
    }

    pub fn get_entry(&self, entry_id: &str) -> Option<Entry> {
        self.entries.get(entry_id).map(|e| e.value().clone())
    }

    pub fn save_entry(&self, entry: &Entry) {
        self.entries.insert(entry.id.clone(), entry.clone());
    }

    pub fn delete_entry(&self, user_id: &str, entry_id: &str) -> bool {
        self.entries
            .remove_if(entry_id, |_, e| e.user_id == user_id)
            .is_some()
    }

    /// Unordered; callers sort.
    pub fn query_entries(&self, user_id: &str, filter: &EntryFilter) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect()
    }
}

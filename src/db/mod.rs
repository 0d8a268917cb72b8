//! Database layer.
//!
//! Production data lives in Firestore; the in-memory store backs local
//! development and the test suite.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Entry, EntryFilter, User};

/// Collection names as constants.
pub mod collections {
    /// User profiles (keyed by email)
    pub const USERS: &str = "users";
    /// Journal entries (keyed by entry ID)
    pub const ENTRIES: &str = "entries";
}

/// Storage backend selected at startup.
#[derive(Clone)]
pub enum Database {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl Database {
    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user_by_email(email).await,
            Self::Memory(db) => Ok(db.get_user_by_email(email)),
        }
    }

    /// Store a user unless one with the same email already exists.
    ///
    /// Returns `false` when the email is taken.
    pub async fn create_user(&self, user: &User) -> Result<bool, AppError> {
        match self {
            Self::Firestore(db) => db.create_user(user).await,
            Self::Memory(db) => Ok(db.create_user(user)),
        }
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.upsert_user(user).await,
            Self::Memory(db) => {
                db.upsert_user(user);
                Ok(())
            }
        }
    }

    // ─── Entry Operations ────────────────────────────────────────

    /// Fetch an entry, but only if `user_id` owns it.
    pub async fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<Option<Entry>, AppError> {
        let entry = match self {
            Self::Firestore(db) => db.get_entry(entry_id).await?,
            Self::Memory(db) => db.get_entry(entry_id),
        };
        Ok(entry.filter(|e| e.user_id == user_id))
    }

    pub async fn save_entry(&self, entry: &Entry) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.save_entry(entry).await,
            Self::Memory(db) => {
                db.save_entry(entry);
                Ok(())
            }
        }
    }

    /// Delete an entry owned by `user_id`. Returns `false` if there was
    /// nothing to delete.
    pub async fn delete_entry(&self, user_id: &str, entry_id: &str) -> Result<bool, AppError> {
        match self {
            Self::Firestore(db) => {
                if self.get_entry(user_id, entry_id).await?.is_none() {
                    return Ok(false);
                }
                db.delete_entry(entry_id).await?;
                Ok(true)
            }
            Self::Memory(db) => Ok(db.delete_entry(user_id, entry_id)),
        }
    }

    /// All of a user's entries matching `filter`, newest first.
    pub async fn query_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, AppError> {
        let mut entries = match self {
            Self::Firestore(db) => db.query_entries(user_id, filter).await?,
            Self::Memory(db) => db.query_entries(user_id, filter),
        };
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}

/// `created_at` descending, ties broken by ID descending.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

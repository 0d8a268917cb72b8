//! User model for storage and API.

use crate::time_utils::fixed_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore (document ID is the email).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate user ID (UUID v4), referenced by entries
    pub id: String,
    /// Email address from the Google account (unique)
    pub email: String,
    /// Display name
    pub full_name: Option<String>,
    /// Profile picture URL
    pub picture_url: Option<String>,
    /// When the user first signed in
    #[serde(with = "fixed_rfc3339")]
    pub created_at: DateTime<Utc>,
    /// Last profile change
    #[serde(with = "fixed_rfc3339")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        full_name: Option<String>,
        picture_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            full_name: non_empty(full_name),
            picture_url: non_empty(picture_url),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh name/picture from the identity provider.
    ///
    /// Empty or missing values never overwrite what is stored. Returns
    /// `true` if anything changed.
    pub fn apply_profile(
        &mut self,
        full_name: Option<&str>,
        picture_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> bool {
        let mut changed = false;

        if let Some(name) = full_name.map(str::trim).filter(|n| !n.is_empty()) {
            if self.full_name.as_deref() != Some(name) {
                self.full_name = Some(name.to_string());
                changed = true;
            }
        }

        if let Some(picture) = picture_url.map(str::trim).filter(|p| !p.is_empty()) {
            if self.picture_url.as_deref() != Some(picture) {
                self.picture_url = Some(picture.to_string());
                changed = true;
            }
        }

        if changed {
            self.updated_at = now;
        }
        changed
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_user_drops_blank_profile_fields() {
        let user = User::new("a@x.com", Some("  ".to_string()), None, t(1));
        assert_eq!(user.full_name, None);
        assert_eq!(user.picture_url, None);
        assert_eq!(user.created_at, user.updated_at);
        assert!(uuid::Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_apply_profile_updates_changed_values() {
        let mut user = User::new("a@x.com", Some("Ann".to_string()), None, t(1));

        assert!(user.apply_profile(Some("Ann Smith"), Some("https://pic"), t(2)));
        assert_eq!(user.full_name.as_deref(), Some("Ann Smith"));
        assert_eq!(user.picture_url.as_deref(), Some("https://pic"));
        assert_eq!(user.updated_at, t(2));
        assert_eq!(user.created_at, t(1));
    }

    #[test]
    fn test_apply_profile_keeps_values_when_provider_sends_nothing() {
        let mut user = User::new(
            "a@x.com",
            Some("Ann".to_string()),
            Some("https://pic".to_string()),
            t(1),
        );

        assert!(!user.apply_profile(None, Some(""), t(2)));
        assert!(!user.apply_profile(Some("Ann"), Some("https://pic"), t(3)));
        assert_eq!(user.full_name.as_deref(), Some("Ann"));
        assert_eq!(user.updated_at, t(1));
    }
}
